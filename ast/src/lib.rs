//! valibot-gen-ast
//!
//! The in-memory form of a generated valibot module:
//!  1) `Node`, an expression tree with a canonical text serialization,
//!  2) `ImportMap`, the external symbols an expression tree refers to,
//!  3) `Declaration` / `File`, exported schema constants grouped per output module.
//!
//! ```
//! use valibot_gen_ast::*;
//!
//! let body = Node::call("object", Origin::package("valibot"), vec![
//!     Node::object(vec![("name", Node::call("string", Origin::package("valibot"), vec![]))]),
//! ]);
//! let decl = Declaration::new("PersonSchema", body);
//! assert_eq!(decl.serialize(), "export const PersonSchema = () => object({\n\tname: string()\n})");
//! ```

pub mod node;
pub mod imports;
pub mod declaration;

pub use node::*;
pub use imports::*;
pub use declaration::*;
