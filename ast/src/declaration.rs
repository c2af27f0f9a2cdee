use crate::imports::ImportMap;
use crate::node::Node;

/// `export const <name> = () => <body>`
///
/// The body sits behind a zero-argument arrow so that schema construction is
/// deferred to call time. Generated modules may import each other in cycles;
/// evaluating the bodies eagerly at module load would observe half-initialized
/// bindings.
#[derive(Debug, Clone, PartialEq)]
pub struct Declaration {
    pub name:    String,
    pub body:    Node,
    pub comment: Option<String>,
}

impl Declaration {
    pub fn new(name: &str, body: Node) -> Self {
        Declaration { name: name.to_string(), body, comment: None }
    }

    pub fn with_comment(mut self, comment: Option<String>) -> Self {
        self.comment = comment;
        self
    }

    pub fn imports(&self) -> ImportMap {
        ImportMap::collect(&self.body)
    }

    pub fn serialize(&self) -> String {
        let doc = self.comment.as_deref().map(format_comment).unwrap_or_default();
        format!("{}export const {} = () => {}", doc, self.name, self.body.serialize())
    }
}

/// Rewrap a source comment as a JSDoc block. Line comment markers are
/// stripped; returns an empty string when nothing but whitespace remains.
pub fn format_comment(comment: &str) -> String {
    let lines: Vec<String> = comment
        .lines()
        .map(|line| {
            let line = line.trim();
            let line = line.strip_prefix("//").unwrap_or(line);
            line.trim().replace("*/", "* /")
        })
        .collect();

    let start = lines.iter().position(|l| !l.is_empty());
    let end = lines.iter().rposition(|l| !l.is_empty());
    let (start, end) = match (start, end) {
        (Some(start), Some(end)) => (start, end),
        _ => return String::new(),
    };
    let lines = &lines[start..=end];

    if lines.len() == 1 {
        return format!("/** {} */\n", lines[0]);
    }

    let mut out = String::from("/**\n");
    for line in lines {
        if line.is_empty() {
            out.push_str(" *\n");
        } else {
            out.push_str(" * ");
            out.push_str(line);
            out.push('\n');
        }
    }
    out.push_str(" */\n");
    out
}

/// One generated module: the declarations synthesized from one `.proto` file.
#[derive(Debug, Clone, PartialEq)]
pub struct File {
    /// Path of the `.proto` source this module was generated from.
    pub path:         String,
    pub declarations: Vec<Declaration>,
}

impl File {
    pub fn new(path: &str, declarations: Vec<Declaration>) -> Self {
        File { path: path.to_string(), declarations }
    }

    /// Union of every declaration's import requirements.
    pub fn imports(&self) -> ImportMap {
        let mut imports = ImportMap::new();
        for decl in &self.declarations {
            imports.merge(decl.imports());
        }
        imports
    }

    pub fn exported_names(&self) -> impl Iterator<Item = &str> {
        self.declarations.iter().map(|d| d.name.as_str())
    }
}
