//! # tether - a state-threading lexer and recursive-descent parser
//!
//! tether turns source text into a syntax tree without any mutable parser
//! state. Every step takes an immutable value and returns a new one: the
//! tokenizer threads a [`lexer::Cursor`], the parser threads a
//! [`parser::TokenStream`]. Lookahead is plain inspection and backtracking is
//! trying another rule on the same input value.
//!
//! ## Architecture Overview
//!
//! 1. **Lexer** (`lexer`) - longest-match tokenizer over a character cursor
//! 2. **Parser** (`parser`) - combinator-based recursive descent over tokens
//! 3. **Syntax tree** (`ast`) - the immutable result of a successful parse
//! 4. **Rendering** (`fmt`) - canonical, fully parenthesized source output
//!
//! ## Pipeline Flow
//!
//! ```text
//! Source Code (&str)
//!     ↓
//! [Lexer] → Vec<Token> ending in Eof
//!     ↓
//! [TokenStream] → significant tokens, trivia kept aside
//!     ↓
//! [Parser] → ast::Program
//! ```
//!
//! ## Key Design Decisions
//!
//! ### Values instead of state
//! A parse rule is `Fn(&TokenStream) -> Result<(T, TokenStream), ParseFailure>`.
//! Because the input is only borrowed, a failed alternative leaves nothing to
//! undo. Streams share their tokens through `Rc`, so cloning one is cheap.
//!
//! ### Failures as values
//! Lexing and parsing stop at the first failure that survives propagation
//! ([`error::Failure`]). Speculative attempts that were given up still count
//! for diagnostics: the reported failure is the one that got furthest into the
//! input.
//!
//! ### Bounded resources
//! Recursion uses the native call stack. A configurable nesting limit
//! ([`config::ParseConfig::max_depth`]) fails fast instead of overflowing it,
//! and grammar rules ask for lookahead through a budget
//! ([`config::ParseConfig::lookahead_depth`]).
//!
//! ## Module Structure
//!
//! - [`lexer`] - cursor, tokens and the tokenizer
//! - [`parser`] - token stream, combinators and the grammar
//! - [`ast`] - syntax tree definitions
//! - [`config`] - parse configuration
//! - [`error`] - lex and parse failures
//! - [`fmt`] - canonical rendering
//!
//! ## Example
//!
//! ```
//! use tether::config::ParseConfig;
//! use tether::parser::parse;
//!
//! let program = parse("let x = 1 + 2 * 3;", &ParseConfig::default()).unwrap();
//! assert_eq!(program.to_string(), "let x = (1 + (2 * 3));\n");
//! ```

pub mod ast;
pub mod config;
pub mod error;
pub mod fmt;
pub mod lexer;
pub mod parser;

pub use config::ParseConfig;
pub use error::Failure;
pub use parser::{parse, parse_expression_str};
