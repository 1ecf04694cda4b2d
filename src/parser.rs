//! Parser for the clause syntax.
//!
//! ```text
//! % facts and rules end with a full stop
//! father(abraham, isaac).
//! grandfather(X, Y) :- father(X, Z), father(Z, Y).
//! first([X, _], X) :- !.
//! ```
//!
//! Names starting with an uppercase letter or `_` are variables scoped to
//! the clause or query they appear in; a lone `_` is the wildcard. Integers,
//! `"strings"`, `true`/`false`, lowercase symbols, compounds `f(a, b)` and
//! lists `[a, b]` are the other terms.

use crate::dsl::Scope;
use crate::engine::{Rule, RuleSet};
use crate::error::{Error, Result};
use crate::term::{Atom, Goal, Term};
use nom::{
    branch::alt,
    bytes::complete::{escaped_transform, is_not, tag, take_while},
    character::complete::{char, digit1, multispace1, not_line_ending, satisfy},
    combinator::{all_consuming, map, map_res, opt, recognize, value},
    multi::{many0, separated_list0, separated_list1},
    sequence::{delimited, pair, preceded, terminated},
    Finish, IResult,
};
use std::str::FromStr;

/// A term as written, before its variable names are bound
#[derive(Debug, Clone, PartialEq)]
enum Syntax {
    Var(String),
    Wildcard,
    Atom(Atom),
    List(Vec<Syntax>),
    Compound(String, Vec<Syntax>),
}

impl Syntax {
    fn into_term(self, scope: &mut Scope) -> Term {
        match self {
            Syntax::Var(name) => scope.var(&name),
            Syntax::Wildcard => Term::Wildcard,
            Syntax::Atom(atom) => Term::Atom(atom),
            Syntax::List(items) => {
                Term::List(items.into_iter().map(|item| item.into_term(scope)).collect())
            }
            Syntax::Compound(functor, args) => {
                let args: Vec<Term> = args.into_iter().map(|arg| arg.into_term(scope)).collect();
                Term::compound(functor, args)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum BodyGoal {
    Term(Syntax),
    Cut,
}

#[derive(Debug, Clone, PartialEq)]
struct Clause {
    head: Syntax,
    body: Vec<BodyGoal>,
}

impl Clause {
    fn into_rule(self) -> Rule {
        let mut scope = Scope::new();
        let head = self.head.into_term(&mut scope);
        let body: Vec<Goal> = self
            .body
            .into_iter()
            .map(|goal| match goal {
                BodyGoal::Term(term) => Goal::Term(term.into_term(&mut scope)),
                BodyGoal::Cut => Goal::Cut,
            })
            .collect();
        Rule::new(head, body)
    }
}

/// Parse a whole program into its rules, in order
///
/// # Errors
///
/// Returns [`Error::Parse`] with the line of the first malformed clause.
pub fn parse_program(input: &str) -> Result<Vec<Rule>> {
    let clauses = parse_all(input, many0(parse_clause))?;
    Ok(clauses.into_iter().map(Clause::into_rule).collect())
}

/// Parse a single clause
///
/// # Errors
///
/// Returns [`Error::Parse`] unless the input is exactly one clause.
pub fn parse_rule(input: &str) -> Result<Rule> {
    parse_all(input, parse_clause).map(Clause::into_rule)
}

/// Parse a query. A leading `?-` and a trailing `.` are optional.
///
/// # Errors
///
/// Returns [`Error::Parse`] when the input is not a single term.
pub fn parse_query(input: &str) -> Result<Term> {
    let query = delimited(opt(token(tag("?-"))), parse_term_syntax, opt(token(char('.'))));
    parse_all(input, query).map(|syntax| syntax.into_term(&mut Scope::new()))
}

/// Parse a single term
///
/// # Errors
///
/// Returns [`Error::Parse`] when the input is not a single term.
pub fn parse_term(input: &str) -> Result<Term> {
    parse_all(input, parse_term_syntax).map(|syntax| syntax.into_term(&mut Scope::new()))
}

impl FromStr for RuleSet {
    type Err = Error;

    fn from_str(input: &str) -> Result<Self> {
        RuleSet::new(parse_program(input)?)
    }
}

fn parse_all<'a, O>(
    input: &'a str,
    parser: impl FnMut(&'a str) -> IResult<&'a str, O>,
) -> Result<O> {
    all_consuming(terminated(parser, skip_space))(input)
        .finish()
        .map(|(_, output)| output)
        .map_err(|error| Error::Parse(describe(input, error.input)))
}

fn describe(input: &str, rest: &str) -> String {
    let rest = rest.trim_start();
    let offset = input.len() - rest.len();
    let line = input[..offset].matches('\n').count() + 1;
    if rest.is_empty() {
        return format!("unexpected end of input on line {line}");
    }
    let near: String = rest.chars().take(24).collect();
    format!("unexpected {near:?} on line {line}")
}

/// Whitespace and `%` comments
fn skip_space(input: &str) -> IResult<&str, ()> {
    value(
        (),
        many0(alt((multispace1, preceded(char('%'), not_line_ending)))),
    )(input)
}

fn token<'a, O>(
    parser: impl FnMut(&'a str) -> IResult<&'a str, O>,
) -> impl FnMut(&'a str) -> IResult<&'a str, O> {
    preceded(skip_space, parser)
}

fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn parse_clause(input: &str) -> IResult<&str, Clause> {
    let (input, head) = parse_term_syntax(input)?;
    let (input, body) = opt(preceded(
        token(tag(":-")),
        separated_list1(token(char(',')), parse_goal),
    ))(input)?;
    let (input, _) = token(char('.'))(input)?;
    Ok((
        input,
        Clause {
            head,
            body: body.unwrap_or_default(),
        },
    ))
}

fn parse_goal(input: &str) -> IResult<&str, BodyGoal> {
    alt((
        value(BodyGoal::Cut, token(char('!'))),
        map(parse_term_syntax, BodyGoal::Term),
    ))(input)
}

fn parse_term_syntax(input: &str) -> IResult<&str, Syntax> {
    token(alt((
        parse_list,
        parse_string,
        parse_integer,
        parse_variable,
        parse_symbol_or_compound,
    )))(input)
}

fn parse_arguments(input: &str) -> IResult<&str, Vec<Syntax>> {
    separated_list0(token(char(',')), parse_term_syntax)(input)
}

fn parse_list(input: &str) -> IResult<&str, Syntax> {
    map(
        delimited(char('['), parse_arguments, token(char(']'))),
        Syntax::List,
    )(input)
}

fn parse_string(input: &str) -> IResult<&str, Syntax> {
    let escapes = alt((
        value("\\", char('\\')),
        value("\"", char('"')),
        value("\n", char('n')),
        value("\t", char('t')),
    ));
    let contents = map(opt(escaped_transform(is_not("\\\""), '\\', escapes)), Option::unwrap_or_default);
    map(delimited(char('"'), contents, char('"')), |s| {
        Syntax::Atom(Atom::Str(s))
    })(input)
}

fn parse_integer(input: &str) -> IResult<&str, Syntax> {
    map_res(recognize(pair(opt(char('-')), digit1)), |digits: &str| {
        digits.parse::<i64>().map(|n| Syntax::Atom(Atom::Int(n)))
    })(input)
}

fn parse_variable(input: &str) -> IResult<&str, Syntax> {
    let name = recognize(pair(
        satisfy(|c| c.is_uppercase() || c == '_'),
        take_while(is_name_char),
    ));
    map(name, |name: &str| match name {
        "_" => Syntax::Wildcard,
        _ => Syntax::Var(name.to_string()),
    })(input)
}

fn parse_symbol_or_compound(input: &str) -> IResult<&str, Syntax> {
    let (input, name) = recognize(pair(satisfy(char::is_lowercase), take_while(is_name_char)))(input)?;
    let (input, args) = opt(delimited(char('('), parse_arguments, token(char(')'))))(input)?;
    let syntax = match (name, args) {
        (_, Some(args)) => Syntax::Compound(name.to_string(), args),
        ("true", None) => Syntax::Atom(Atom::Bool(true)),
        ("false", None) => Syntax::Atom(Atom::Bool(false)),
        (_, None) => Syntax::Atom(Atom::Symbol(name.to_string())),
    };
    Ok((input, syntax))
}
