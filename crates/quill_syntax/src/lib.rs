//! Quill Syntax
//!
//! 前端的语法部分：
//! - [`lexer`]: logos 词法分析，产生原始 token
//! - [`group`]: 括号分组，把原始 token 折叠成 [`Token`] 的嵌套结构
//! - [`parser`]: 声明文件（prelude）的 chumsky 解析器

pub mod ast;
pub mod group;
pub mod lexer;
pub mod parser;
pub mod token;

pub use ast::{Decl, DefaultValue, Param};
pub use group::{group, split_lines, tokenize};
pub use lexer::{lex, line_of, LexError, RawToken};
pub use parser::{parse_declarations, ParseError};
pub use token::{Delimiter, Token, TokenKind};
