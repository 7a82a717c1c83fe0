//! Reading and writing of the Well-Known Text representation of [`Geometry`](wktview_types::Geometry).
//!
//! The reader accepts the seven OGC simple feature kinds in any letter case, with optional `Z`, `M` and `ZM`
//! dimension tags. Ordinates beyond the second are read and dropped. The writer always produces the canonical form:
//! upper case keywords, a space before the opening parenthesis and `, ` between members.

mod lexer;
mod parser;
mod writer;

pub use parser::parse;
pub use writer::{to_wkt, write_wkt};
