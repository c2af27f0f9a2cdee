//! Builders for the valibot calls the synthesizer emits.

use valibot_gen_ast::{Node, Origin};

pub const VALIBOT: &str = "valibot";

fn method(name: &str, args: Vec<Node>) -> Node {
    Node::call(name, Origin::package(VALIBOT), args)
}

pub fn object(fields: Vec<(String, Node)>) -> Node {
    method("object", vec![Node::object(fields)])
}

pub fn partial(schema: Node) -> Node {
    method("partial", vec![schema])
}

pub fn array(item: Node) -> Node {
    method("array", vec![item])
}

pub fn record(key: Node, value: Node) -> Node {
    method("record", vec![key, value])
}

pub fn string() -> Node {
    method("string", vec![])
}

pub fn number() -> Node {
    method("number", vec![])
}

pub fn boolean() -> Node {
    method("boolean", vec![])
}

pub fn any() -> Node {
    method("any", vec![])
}

pub fn pipe(schema: Node, actions: Vec<Node>) -> Node {
    let mut args = Vec::with_capacity(actions.len() + 1);
    args.push(schema);
    args.extend(actions);
    method("pipe", args)
}

pub fn min_length(length: i64) -> Node {
    method("minLength", vec![Node::number(length)])
}

/// `union([a, b, ...])`
pub fn union(options: Vec<Node>) -> Node {
    method("union", vec![Node::array(options)])
}

/// `intersect([a, b, ...])`
pub fn intersect(options: Vec<Node>) -> Node {
    method("intersect", vec![Node::array(options)])
}
