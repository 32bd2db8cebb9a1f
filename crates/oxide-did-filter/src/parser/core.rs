use crate::ast::{AndGroup, Condition, Operator, OrExpression, TypedValue};
use crate::error::{FilterError, Result};
use crate::lexer::{Lexer, Span, Token, TokenKind};
use crate::reserved::ReservedKeys;
use crate::typer::{self, looks_like_literal};

/// A raw, unresolved term: a bare word or a quoted string, not yet known to
/// be a key or a literal value.
struct RawTerm {
    text: String,
    quoted: bool,
    span: Span,
}

enum Side {
    Left,
    Right,
}

/// Decides which side of a two-term condition is the key, or `None` if
/// both sides are plain literals (a literal condition).
///
/// Order of preference: a quoted side is always a literal and never a key.
/// If both sides are literal-shaped, it's a literal condition. Otherwise,
/// whichever side names a declared reserved key wins; failing that,
/// whichever side does *not* look like a parseable literal is the key;
/// failing that (neither side decidable), the left side defaults to key.
fn classify(left: &RawTerm, right: &RawTerm, reserved: &ReservedKeys) -> Option<Side> {
    let left_literal_only = left.quoted || looks_like_literal(&left.text);
    let right_literal_only = right.quoted || looks_like_literal(&right.text);
    if left_literal_only && right_literal_only {
        return None;
    }

    let left_reserved = !left.quoted && reserved.contains(&left.text);
    let right_reserved = !right.quoted && reserved.contains(&right.text);
    if left_reserved && !right_reserved {
        return Some(Side::Left);
    }
    if right_reserved && !left_reserved {
        return Some(Side::Right);
    }

    let left_parses = !left.quoted && looks_like_literal(&left.text);
    let right_parses = !right.quoted && looks_like_literal(&right.text);
    if right_parses && !left_parses {
        return Some(Side::Left);
    }
    if left_parses && !right_parses {
        return Some(Side::Right);
    }
    Some(Side::Left)
}

/// `a OP b` read with the key on the left reads the same as `b flip(OP) a`
/// read with the key on the right; `Eq`/`Ne` are symmetric and need no
/// flip.
fn op_as_seen_from_key(op: Operator, key_on_right: bool) -> Operator {
    if key_on_right {
        op.flip().unwrap_or(op)
    } else {
        op
    }
}

fn check_wildcard_rules(key: Option<&str>, op: Operator, value: &TypedValue, is_str_reserved_key: bool, is_non_str_reserved_key: bool) -> Result<()> {
    if !value.is_wildcard_str() {
        return Ok(());
    }
    if !matches!(op, Operator::Eq | Operator::Ne) {
        return Err(FilterError::InvalidValue {
            key: key.map(str::to_string),
            message: "wildcard values are only permitted with = and !=".to_string(),
        });
    }
    if is_non_str_reserved_key && !is_str_reserved_key {
        return Err(FilterError::InvalidValue {
            key: key.map(str::to_string),
            message: "wildcard values are not permitted for a non-string reserved key".to_string(),
        });
    }
    Ok(())
}

/// Hand-written recursive-descent reader over the token stream, resolving
/// key/literal ambiguity and coercing values as it goes.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    current: Token,
    reserved: &'a ReservedKeys,
    strict: bool,
}

impl<'a> Parser<'a> {
    pub fn new(source: &'a str, reserved: &'a ReservedKeys, strict: bool) -> Result<Self> {
        let mut lexer = Lexer::new(source);
        let current = lexer.next_token()?;
        Ok(Self {
            lexer,
            current,
            reserved,
            strict,
        })
    }

    fn bump(&mut self) -> Result<Token> {
        let next = self.lexer.next_token()?;
        Ok(std::mem::replace(&mut self.current, next))
    }

    fn parse_term(&mut self) -> Result<RawTerm> {
        let token = self.bump()?;
        match token.kind {
            TokenKind::Word(text) => Ok(RawTerm {
                text,
                quoted: false,
                span: token.span,
            }),
            TokenKind::QuotedString(text) => Ok(RawTerm {
                text,
                quoted: true,
                span: token.span,
            }),
            _ => Err(FilterError::InvalidSyntax {
                message: "expected a key or value".to_string(),
                offset: token.span.start,
            }),
        }
    }

    fn parse_operator(&mut self) -> Result<Operator> {
        let token = self.bump()?;
        match token.kind {
            TokenKind::Op(op) => Ok(op),
            _ => Err(FilterError::InvalidSyntax {
                message: "expected a comparison operator".to_string(),
                offset: token.span.start,
            }),
        }
    }

    fn coerce(&self, key: Option<&str>, reserved_type: Option<crate::reserved::ReservedType>, term: &RawTerm) -> Result<TypedValue> {
        typer::coerce_value(key, reserved_type, &term.text, term.quoted, self.strict)
    }

    /// Parses one `term op term [op term]` production, returning the one or
    /// two `Condition`s it expands to.
    fn parse_condition(&mut self) -> Result<Vec<Condition>> {
        let term1 = self.parse_term()?;
        let op1 = self.parse_operator()?;
        let term2 = self.parse_term()?;

        if matches!(self.current.kind, TokenKind::Op(_)) {
            let op2 = self.parse_operator()?;
            let term3 = self.parse_term()?;
            return self.parse_compound(term1, op1, term2, op2, term3);
        }

        match classify(&term1, &term2, self.reserved) {
            None => {
                let left = self.coerce(None, None, &term1)?;
                let right = self.coerce(None, None, &term2)?;
                check_wildcard_rules(None, op1, &left, false, false)?;
                check_wildcard_rules(None, op1, &right, false, false)?;
                Ok(vec![Condition {
                    key: None,
                    op: op1,
                    value: right,
                    literal_lhs: Some(left),
                }])
            }
            Some(side) => {
                let (raw_key, literal_term, key_on_right) = match side {
                    Side::Left => (term1.text.as_str(), &term2, false),
                    Side::Right => (term2.text.as_str(), &term1, true),
                };
                let (resolved_key, legacy_op, reserved_type) = typer::resolve_key(raw_key, self.reserved);
                let op = match legacy_op {
                    Some(legacy_op) if matches!(op1, Operator::Eq) => legacy_op,
                    _ => op_as_seen_from_key(op1, key_on_right),
                };
                let value = self.coerce(Some(resolved_key), reserved_type, literal_term)?;
                let equality_only = self.reserved.equality_only(resolved_key);
                let non_str_reserved = reserved_type.is_some()
                    && reserved_type != Some(crate::reserved::ReservedType::Str);
                check_wildcard_rules(
                    Some(resolved_key),
                    op,
                    &value,
                    reserved_type == Some(crate::reserved::ReservedType::Str),
                    non_str_reserved,
                )?;
                if equality_only && op.is_ordering() {
                    return Err(FilterError::InvalidValue {
                        key: Some(resolved_key.to_string()),
                        message: "key only supports = and !=".to_string(),
                    });
                }
                Ok(vec![Condition {
                    key: Some(resolved_key.to_string()),
                    op,
                    value,
                    literal_lhs: None,
                }])
            }
        }
    }

    fn parse_compound(
        &self,
        term1: RawTerm,
        op1: Operator,
        term2: RawTerm,
        op2: Operator,
        term3: RawTerm,
    ) -> Result<Vec<Condition>> {
        if term2.quoted {
            return Err(FilterError::InvalidSyntax {
                message: "the middle term of a compound inequality must be a key".to_string(),
                offset: term2.span.start,
            });
        }
        if matches!(op1, Operator::Eq | Operator::Ne) || matches!(op2, Operator::Eq | Operator::Ne)
        {
            return Err(FilterError::InvalidSyntax {
                message: "= and != cannot appear in a compound inequality".to_string(),
                offset: term2.span.start,
            });
        }
        if op1.direction() != op2.direction() {
            return Err(FilterError::DuplicateCriterion {
                key: term2.text.clone(),
            });
        }

        // A middle term that is not a declared key and parses as a plain
        // literal (e.g. `3 > 2 > 1`) is a chain of two literal conditions,
        // not a range on a key: `a OP1 b OP2 c` decomposes directly into
        // `(a OP1 b) AND (b OP2 c)`, with no flip — unlike the keyed case,
        // neither side is pinned to a "key OP value" triple.
        if !self.reserved.contains(&term2.text) && looks_like_literal(&term2.text) {
            let left_value = self.coerce(None, None, &term1)?;
            let mid_value = self.coerce(None, None, &term2)?;
            let right_value = self.coerce(None, None, &term3)?;
            check_wildcard_rules(None, op1, &left_value, false, false)?;
            check_wildcard_rules(None, op1, &mid_value, false, false)?;
            check_wildcard_rules(None, op2, &right_value, false, false)?;
            return Ok(vec![
                Condition {
                    key: None,
                    op: op1,
                    value: mid_value.clone(),
                    literal_lhs: Some(left_value),
                },
                Condition {
                    key: None,
                    op: op2,
                    value: right_value,
                    literal_lhs: Some(mid_value),
                },
            ]);
        }

        let (resolved_key, _legacy_op, reserved_type) = typer::resolve_key(&term2.text, self.reserved);
        if self.reserved.equality_only(resolved_key) {
            return Err(FilterError::InvalidValue {
                key: Some(resolved_key.to_string()),
                message: "key only supports = and !=".to_string(),
            });
        }

        let left_value = self.coerce(Some(resolved_key), reserved_type, &term1)?;
        let right_value = self.coerce(Some(resolved_key), reserved_type, &term3)?;
        let non_str_reserved =
            reserved_type.is_some() && reserved_type != Some(crate::reserved::ReservedType::Str);
        check_wildcard_rules(Some(resolved_key), op1, &left_value, false, non_str_reserved)?;
        check_wildcard_rules(Some(resolved_key), op2, &right_value, false, non_str_reserved)?;

        let flipped = op1.flip().ok_or_else(|| FilterError::InvalidSyntax {
            message: "compound inequality operator cannot be flipped".to_string(),
            offset: term1.span.start,
        })?;

        Ok(vec![
            Condition {
                key: Some(resolved_key.to_string()),
                op: flipped,
                value: left_value,
                literal_lhs: None,
            },
            Condition {
                key: Some(resolved_key.to_string()),
                op: op2,
                value: right_value,
                literal_lhs: None,
            },
        ])
    }

    fn parse_and_group(&mut self) -> Result<AndGroup> {
        let mut conditions = self.parse_condition()?;
        while matches!(self.current.kind, TokenKind::Comma) {
            self.bump()?;
            conditions.extend(self.parse_condition()?);
        }
        Ok(AndGroup(conditions))
    }

    /// Parses the whole source into an `OrExpression`. An empty (or
    /// whitespace-only) source parses to the empty expression, which is
    /// vacuously `FALSE`.
    pub fn parse(mut self) -> Result<OrExpression> {
        if self.current.is_eof() {
            return Ok(OrExpression(Vec::new()));
        }
        let mut groups = vec![self.parse_and_group()?];
        while matches!(self.current.kind, TokenKind::Semicolon) {
            self.bump()?;
            groups.push(self.parse_and_group()?);
        }
        if !self.current.is_eof() {
            return Err(FilterError::InvalidSyntax {
                message: "trailing input after expression".to_string(),
                offset: self.current.span.start,
            });
        }
        Ok(OrExpression(groups))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reserved::ReservedKeys;

    fn parse(src: &str) -> OrExpression {
        let reserved = ReservedKeys::with_defaults();
        Parser::new(src, &reserved, true).unwrap().parse().unwrap()
    }

    #[test]
    fn test_empty_source_is_empty_expression() {
        assert_eq!(parse(""), OrExpression(Vec::new()));
        assert_eq!(parse("   "), OrExpression(Vec::new()));
    }

    #[test]
    fn test_simple_key_condition() {
        let expr = parse("name=test");
        assert_eq!(expr.groups().len(), 1);
        let cond = &expr.groups()[0].conditions()[0];
        assert_eq!(cond.key.as_deref(), Some("name"));
        assert_eq!(cond.op, Operator::Eq);
    }

    #[test]
    fn test_and_group_with_comma() {
        let expr = parse("name=test,length>5");
        assert_eq!(expr.groups()[0].conditions().len(), 2);
    }

    #[test]
    fn test_or_groups_with_semicolon() {
        let expr = parse("name=a;name=b");
        assert_eq!(expr.groups().len(), 2);
    }

    #[test]
    fn test_compound_inequality_expands_to_two_conditions() {
        let expr = parse("0<length<10");
        let conds = expr.groups()[0].conditions();
        assert_eq!(conds.len(), 2);
        assert_eq!(conds[0].op, Operator::Gt);
        assert_eq!(conds[0].value, TypedValue::Int(0));
        assert_eq!(conds[1].op, Operator::Lt);
        assert_eq!(conds[1].value, TypedValue::Int(10));
    }

    #[test]
    fn test_compound_inequality_with_literal_middle_term_is_literal_chain() {
        let expr = parse("3>2>1");
        let conds = expr.groups()[0].conditions();
        assert_eq!(conds.len(), 2);
        assert!(conds[0].is_literal());
        assert!(conds[1].is_literal());
        assert_eq!(conds[0].literal_lhs, Some(TypedValue::Int(3)));
        assert_eq!(conds[0].op, Operator::Gt);
        assert_eq!(conds[0].value, TypedValue::Int(2));
        assert_eq!(conds[1].literal_lhs, Some(TypedValue::Int(2)));
        assert_eq!(conds[1].op, Operator::Gt);
        assert_eq!(conds[1].value, TypedValue::Int(1));
    }

    #[test]
    fn test_compound_inequality_mismatched_direction_errors() {
        let reserved = ReservedKeys::with_defaults();
        let err = Parser::new("1<length>3", &reserved, true)
            .unwrap()
            .parse()
            .unwrap_err();
        assert!(matches!(err, FilterError::DuplicateCriterion { .. }));
    }

    #[test]
    fn test_equality_only_key_rejects_ordering() {
        let reserved = ReservedKeys::with_defaults();
        let err = Parser::new("name>=1", &reserved, false)
            .unwrap()
            .parse()
            .unwrap_err();
        assert!(matches!(err, FilterError::InvalidValue { .. }));
    }

    #[test]
    fn test_literal_condition_has_no_key() {
        let expr = parse("1<2");
        let cond = &expr.groups()[0].conditions()[0];
        assert!(cond.is_literal());
        assert_eq!(cond.literal_lhs, Some(TypedValue::Int(1)));
        assert_eq!(cond.value, TypedValue::Int(2));
    }

    #[test]
    fn test_legacy_created_after_rewrites_to_created_at_ge() {
        let expr = parse("created_after=1900-01-01T00:00:00");
        let cond = &expr.groups()[0].conditions()[0];
        assert_eq!(cond.key.as_deref(), Some("created_at"));
        assert_eq!(cond.op, Operator::Ge);
    }

    #[test]
    fn test_wildcard_rejected_with_ordering_operator() {
        let reserved = ReservedKeys::with_defaults();
        let err = Parser::new("name>=*", &reserved, true)
            .unwrap()
            .parse()
            .unwrap_err();
        assert!(matches!(err, FilterError::InvalidValue { .. }));
    }

    #[test]
    fn test_wildcard_rejected_for_non_string_reserved_key() {
        let reserved = ReservedKeys::with_defaults();
        let err = Parser::new("length=*", &reserved, true)
            .unwrap()
            .parse()
            .unwrap_err();
        assert!(matches!(err, FilterError::InvalidValue { .. }));
    }
}
