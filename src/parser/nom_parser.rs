use nom::{
    branch::alt,
    bytes::complete::{is_not, tag},
    character::complete::{alpha1, alphanumeric1, char, digit1, multispace1, none_of},
    combinator::{map, map_opt, map_res, opt, recognize, value},
    multi::{many0, separated_list0},
    sequence::{delimited, pair, preceded, terminated, tuple},
    IResult,
};
use serde_yaml::{Mapping, Number, Value};

use super::{NodeDef, TreeDef, TreeSource};

fn line_comment(i: &str) -> IResult<&str, ()> {
    value((), pair(char('#'), opt(is_not("\n\r"))))(i)
}

/// Whitespace, newlines and comments.
fn ws(i: &str) -> IResult<&str, ()> {
    value((), many0(alt((value((), multispace1), line_comment))))(i)
}

fn identifier(input: &str) -> IResult<&str, &str> {
    recognize(pair(
        alt((alpha1, tag("_"))),
        many0(alt((alphanumeric1, tag("_")))),
    ))(input)
}

fn number(i: &str) -> IResult<&str, &str> {
    recognize(tuple((
        opt(char('-')),
        digit1,
        opt(pair(char('.'), digit1)),
    )))(i)
}

fn number_value(s: &str) -> Option<Value> {
    let number = if s.contains('.') {
        Number::from(s.parse::<f64>().ok()?)
    } else if let Ok(unsigned) = s.parse::<u64>() {
        Number::from(unsigned)
    } else {
        Number::from(s.parse::<i64>().ok()?)
    };
    Some(Value::Number(number))
}

fn str_literal(input: &str) -> IResult<&str, String> {
    let (r, val) = delimited(char('"'), many0(none_of("\"")), char('"'))(input)?;
    Ok((
        r,
        val.iter()
            .collect::<String>()
            .replace("\\\\", "\\")
            .replace("\\n", "\n"),
    ))
}

fn literal(i: &str) -> IResult<&str, Value> {
    alt((
        map_opt(number, number_value),
        value(Value::Bool(true), tag("true")),
        value(Value::Bool(false), tag("false")),
        map(str_literal, Value::String),
    ))(i)
}

fn arg(i: &str) -> IResult<&str, (Value, Value)> {
    let (i, key) = preceded(ws, identifier)(i)?;
    let (i, _) = preceded(ws, char('='))(i)?;
    let (i, val) = preceded(ws, literal)(i)?;
    Ok((i, (Value::String(key.to_owned()), val)))
}

fn args(i: &str) -> IResult<&str, Value> {
    let (i, pairs) = delimited(
        preceded(ws, char('(')),
        separated_list0(preceded(ws, char(',')), arg),
        preceded(ws, char(')')),
    )(i)?;
    let mut mapping = Mapping::new();
    for (key, val) in pairs {
        mapping.insert(key, val);
    }
    Ok((i, Value::Mapping(mapping)))
}

fn check_interval(i: &str) -> IResult<&str, f64> {
    preceded(
        preceded(ws, char('@')),
        preceded(ws, map_res(number, str::parse::<f64>)),
    )(i)
}

fn children(i: &str) -> IResult<&str, Vec<NodeDef>> {
    delimited(
        preceded(ws, char('{')),
        many0(parse_node),
        preceded(ws, char('}')),
    )(i)
}

/// `["!"] Type ["@" interval] ["(" key = literal, ... ")"] ["{" node* "}"]`
fn parse_node(i: &str) -> IResult<&str, NodeDef> {
    let (i, excl) = opt(preceded(ws, char('!')))(i)?;

    if excl.is_some() {
        let (i, inner) = parse_node(i)?;
        return Ok((i, NodeDef::new_with_children("Inverter", vec![inner])));
    }

    let (i, ty) = preceded(ws, identifier)(i)?;

    let (i, check_interval) = opt(check_interval)(i)?;

    let (i, args) = opt(args)(i)?;

    let (i, children) = opt(children)(i)?;

    Ok((
        i,
        NodeDef {
            ty: ty.to_owned(),
            name: None,
            check_interval,
            args: args.unwrap_or(Value::Null),
            children: children.unwrap_or_default(),
        },
    ))
}

fn parse_tree(i: &str) -> IResult<&str, TreeDef> {
    let (i, _) = preceded(ws, terminated(tag("tree"), multispace1))(i)?;

    let (i, name) = preceded(ws, identifier)(i)?;

    let (i, _) = preceded(ws, char('='))(i)?;

    let (i, root) = parse_node(i)?;

    Ok((
        i,
        TreeDef {
            name: name.to_owned(),
            root,
        },
    ))
}

/// Parses every `tree <name> = <node>` definition of a source.
///
/// The returned remainder is empty if the whole input was consumed.
pub fn parse_file(i: &str) -> IResult<&str, TreeSource> {
    let (i, trees) = many0(parse_tree)(i)?;

    // Eat up trailing comments and newlines to indicate that the input was thoroughly consumed
    let (i, _) = ws(i)?;

    Ok((i, TreeSource { trees }))
}
