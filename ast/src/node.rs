use std::fmt;

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref IDENTIFIER: Regex = Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*$").unwrap();
}

/// Where the symbol named by a `Call` comes from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Origin {
    /// Defined in the module being generated; never imported.
    Local,
    /// Imported from a third-party package, e.g. `valibot`.
    Package(String),
    /// Exported by another generated module, identified by the `.proto`
    /// path that defines it. Resolved into a relative import at render time.
    Lookup { file: String },
}

impl Origin {
    pub fn package(name: &str) -> Self {
        Origin::Package(name.to_string())
    }

    pub fn lookup(file: &str) -> Self {
        Origin::Lookup { file: file.to_string() }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub name:   String,
    pub origin: Origin,
    /// `None` renders a bare reference (`name`), `Some` an invocation
    /// (`name(...)`), even when the argument list is empty.
    pub args:   Option<Vec<Node>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ObjectMember {
    Field { key: String, value: Node },
    Spread(Node),
}

impl ObjectMember {
    pub fn value(&self) -> &Node {
        match self {
            ObjectMember::Field { value, .. } => value,
            ObjectMember::Spread(value) => value,
        }
    }
}

/// One expression of the generated module.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Ident(String),
    Call(Call),
    Object(Vec<ObjectMember>),
    Array(Vec<Node>),
    Str(String),
    Number(i64),
    Paren(Box<Node>),
    Member { object: Box<Node>, field: Box<Node> },
}

impl Node {
    pub fn ident(name: &str) -> Self {
        Node::Ident(name.to_string())
    }

    pub fn call(name: &str, origin: Origin, args: Vec<Node>) -> Self {
        Node::Call(Call { name: name.to_string(), origin, args: Some(args) })
    }

    /// A reference to a symbol without invoking it.
    pub fn reference(name: &str, origin: Origin) -> Self {
        Node::Call(Call { name: name.to_string(), origin, args: None })
    }

    pub fn object<K: Into<String>>(fields: Vec<(K, Node)>) -> Self {
        Node::Object(
            fields
                .into_iter()
                .map(|(key, value)| ObjectMember::Field { key: key.into(), value })
                .collect(),
        )
    }

    pub fn array(elements: Vec<Node>) -> Self {
        Node::Array(elements)
    }

    pub fn string(value: &str) -> Self {
        Node::Str(value.to_string())
    }

    pub fn number(value: i64) -> Self {
        Node::Number(value)
    }

    pub fn paren(inner: Node) -> Self {
        Node::Paren(Box::new(inner))
    }

    pub fn member(object: Node, field: Node) -> Self {
        Node::Member { object: Box::new(object), field: Box::new(field) }
    }

    /// Canonical source text of this expression.
    pub fn serialize(&self) -> String {
        match self {
            Node::Ident(name) => name.clone(),
            Node::Call(call) => match &call.args {
                None => call.name.clone(),
                Some(args) => format!("{}({})", call.name, join(args, ", ")),
            },
            Node::Object(members) => serialize_object(members),
            Node::Array(elements) => format!("[{}]", join(elements, ", ")),
            Node::Str(value) => quote_single(value),
            Node::Number(value) => value.to_string(),
            Node::Paren(inner) => format!("({})", inner.serialize()),
            Node::Member { object, field } => format!("{}.{}", object.serialize(), field.serialize()),
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.serialize())
    }
}

fn join(nodes: &[Node], separator: &str) -> String {
    nodes.iter().map(Node::serialize).collect::<Vec<_>>().join(separator)
}

/// One member per line, each indented by a tab. Nested multi-line values
/// carry the extra indentation with them.
fn serialize_object(members: &[ObjectMember]) -> String {
    if members.is_empty() {
        return "{}".to_string();
    }

    let lines: Vec<String> = members
        .iter()
        .map(|member| {
            let text = match member {
                ObjectMember::Field { key, value } => {
                    format!("{}: {}", object_key(key), value.serialize())
                }
                ObjectMember::Spread(value) => format!("...{}", value.serialize()),
            };
            format!("\t{}", text.replace('\n', "\n\t"))
        })
        .collect();

    format!("{{\n{}\n}}", lines.join(",\n"))
}

fn object_key(key: &str) -> String {
    if IDENTIFIER.is_match(key) {
        key.to_string()
    } else {
        quote_single(key)
    }
}

fn quote_single(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('\'');
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            _ => out.push(c),
        }
    }
    out.push('\'');
    out
}

/// Pre-order traversal over every node reachable from `node`.
///
/// The tree owns its children, so every node is visited exactly once.
/// For `Member`, only the object side is descended into; the field side is a
/// property name, not an expression that can reference symbols.
pub fn walk<'a, F>(node: &'a Node, visit: &mut F)
where
    F: FnMut(&'a Node),
{
    visit(node);

    match node {
        Node::Call(call) => {
            for arg in call.args.iter().flatten() {
                walk(arg, visit);
            }
        }
        Node::Object(members) => {
            for member in members {
                walk(member.value(), visit);
            }
        }
        Node::Array(elements) => {
            for element in elements {
                walk(element, visit);
            }
        }
        Node::Paren(inner) => walk(inner, visit),
        Node::Member { object, .. } => walk(object, visit),
        Node::Ident(_) | Node::Str(_) | Node::Number(_) => {}
    }
}
