use tether::config::ParseConfig;
use tether::error::{Failure, FailureKind, LexFailureKind};
use tether::lexer::{TokenKind, tokenize};
use tether::parser::{TokenStream, parse};

fn kinds(source: &str, config: &ParseConfig) -> Vec<TokenKind> {
    tokenize(source, config)
        .unwrap()
        .into_iter()
        .map(|t| t.kind)
        .collect()
}

#[test]
fn single_line_comment_ignored() {
    let source = r#"
        // This is a comment
        let answer = 42
    "#;

    let kinds = kinds(source, &ParseConfig::default());
    assert_eq!(
        kinds,
        vec![
            TokenKind::Let,
            TokenKind::Ident,
            TokenKind::Assign,
            TokenKind::Integer,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn multi_line_comment_ignored() {
    let source = r#"
        /* This is a
           multi-line comment */
        let answer = 42
    "#;

    let program = parse(source, &ParseConfig::default()).unwrap();
    assert_eq!(program.statements.len(), 1);
}

#[test]
fn comment_at_end_of_file() {
    let program = parse("f(1) // trailing", &ParseConfig::default()).unwrap();
    assert_eq!(program.to_string(), "f(1);\n");
}

#[test]
fn comment_between_tokens() {
    let program = parse("1 /* plus */ + /* two */ 2", &ParseConfig::default()).unwrap();
    assert_eq!(program.to_string(), "(1 + 2);\n");
}

#[test]
fn comment_markers_are_not_division() {
    let config = ParseConfig::default();
    assert_eq!(
        kinds("a / b // c", &config),
        vec![
            TokenKind::Ident,
            TokenKind::Slash,
            TokenKind::Ident,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn block_comments_do_not_nest() {
    let config = ParseConfig::default();
    assert_eq!(
        kinds("/* a /* b */ c */", &config),
        vec![
            TokenKind::Ident,
            TokenKind::Star,
            TokenKind::Slash,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn unterminated_block_comment_fails_at_its_start() {
    let err = parse("x /* never closed", &ParseConfig::default()).unwrap_err();
    assert_eq!(err.kind(), FailureKind::Lex);
    let Failure::Lex(lex) = err else {
        panic!("expected a lex failure");
    };
    assert_eq!(lex.kind, LexFailureKind::UnterminatedComment);
    assert_eq!(lex.position.offset, 2);
}

#[test]
fn trivia_tokens_are_emitted_on_request() {
    let config = ParseConfig::default().with_emit_trivia(true);
    assert_eq!(
        kinds("a  // note\nb", &config),
        vec![
            TokenKind::Ident,
            TokenKind::Whitespace,
            TokenKind::Comment,
            TokenKind::Whitespace,
            TokenKind::Ident,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn trivia_lexemes_reproduce_the_source() {
    let source = "let a = 1; /* one */\n// done\n";
    let config = ParseConfig::default().with_emit_trivia(true);
    let text: String = tokenize(source, &config)
        .unwrap()
        .iter()
        .map(|t| t.lexeme.as_str())
        .collect();
    assert_eq!(text, source);
}

#[test]
fn parser_never_sees_trivia() {
    let config = ParseConfig::default().with_emit_trivia(true);
    let stream = TokenStream::from_source("a /* x */ + b", config.clone()).unwrap();
    assert!(stream.tokens().iter().all(|t| !t.kind.is_trivia()));
    assert_eq!(stream.trivia().len(), 4);

    let program = parse("a /* x */ + b", &config).unwrap();
    assert_eq!(program.to_string(), "(a + b);\n");
}
