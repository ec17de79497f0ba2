use super::*;
use crate::api::{Options, StallPolicy};
use crate::error::{BuildError, LexError};
use crate::languages::{LanguageDef, Registry};
use crate::token::{Token, TokenKind};
use test_log::test;

static TOY: LanguageDescriptor =
    LanguageDescriptor { name: "Toy", aliases: &["toy"], filenames: &["*.toy"], mimetypes: &[], description: "" };

static INNER: LanguageDescriptor =
    LanguageDescriptor { name: "Inner", aliases: &[], filenames: &[], mimetypes: &[], description: "" };

static LOOPY: LanguageDescriptor =
    LanguageDescriptor { name: "Loopy", aliases: &[], filenames: &[], mimetypes: &[], description: "" };

/// `ab` is listed before `abc`, `( ... )` nests a `paren` state, `{...}` is
/// handed to Inner, `<...>` is handed back to Toy itself.
fn toy_table() -> Result<RuleTable, BuildError> {
    RuleTable::builder(&TOY)
        .state(
            ROOT,
            vec![
                rule!("ab" => Behavior::Emit(TokenKind::Keyword)),
                rule!("abc" => Behavior::Emit(TokenKind::Name)),
                rule!("x*" => Behavior::Emit(TokenKind::Operator)),
                rule!(r"\(" => Behavior::EmitAndPush(TokenKind::Punctuation, "paren")),
                rule!(r"\)" => Behavior::EmitAndPop(TokenKind::Punctuation)),
                rule!(
                    r"(\{)([^}]*)(\})" =>
                    Behavior::Composite(vec![
                        Action::emit(1, TokenKind::Punctuation),
                        Action::delegate(2, Target::Named("inner")),
                        Action::emit(3, TokenKind::Punctuation),
                    ])
                ),
                rule!(
                    r"<([^>]*)>" =>
                    Behavior::Composite(vec![Action::delegate(1, Target::Current), Action::Push("paren"), Action::Pop])
                ),
                rule!(r"[a-z]+" => Behavior::Emit(TokenKind::Name)),
                rule!(r"\s+" => Behavior::Emit(TokenKind::Text)),
            ],
        )
        .state(
            "paren",
            vec![
                rule!(r"\)" => Behavior::EmitAndPop(TokenKind::Punctuation)),
                rule!(r"\(" => Behavior::EmitAndPush(TokenKind::Punctuation, "paren")),
                rule!(r"[^()]+" => Behavior::Emit(TokenKind::LiteralString)),
            ],
        )
        .build()
}

fn inner_table() -> Result<RuleTable, BuildError> {
    RuleTable::builder(&INNER)
        .state(
            ROOT,
            vec![
                rule!("[0-9]+" => Behavior::Emit(TokenKind::LiteralNumberInteger)),
                rule!("," => Behavior::Emit(TokenKind::Punctuation)),
            ],
        )
        .build()
}

/// Delegates every match back to itself: never terminates without a depth guard.
fn loopy_table() -> Result<RuleTable, BuildError> {
    RuleTable::builder(&LOOPY).state(ROOT, vec![rule!(".+" => Behavior::Delegate(Target::Current))]).build()
}

fn registry() -> Registry {
    let mut registry = Registry::new();
    registry.register(LanguageDef { descriptor: &TOY, build: toy_table });
    registry.register(LanguageDef { descriptor: &INNER, build: inner_table });
    registry.register(LanguageDef { descriptor: &LOOPY, build: loopy_table });
    registry
}

fn run_with(language: &str, input: &str, options: &Options) -> Result<Vec<Token>, LexError> {
    let registry = registry();
    let table = registry.table(language)?;
    let mut tokens = Vec::new();
    Lexer::new(&table, &registry, options).run(input, &mut tokens)?;
    Ok(tokens)
}

fn run(input: &str) -> Result<Vec<Token>, LexError> {
    run_with("toy", input, &Options::default())
}

fn tok(kind: TokenKind, text: &str) -> Token {
    Token::new(kind, text)
}

#[test]
fn first_matching_rule_wins_over_longer_match() {
    // `ab` wins although `abc` would match more; `c` is then a plain name.
    assert_eq!(run("abc").unwrap(), vec![tok(TokenKind::Keyword, "ab"), tok(TokenKind::Name, "c")]);
}

#[test]
fn zero_length_matches_are_skipped() {
    // `x*` matches the empty string everywhere; it must not stop the scan.
    assert_eq!(
        run("xx q").unwrap(),
        vec![tok(TokenKind::Operator, "xx"), tok(TokenKind::Text, " "), tok(TokenKind::Name, "q")]
    );
}

#[test]
fn push_and_pop_restore_the_stack() {
    let registry = registry();
    let table = registry.table("toy").unwrap();
    let options = Options::default();
    let lexer = Lexer::new(&table, &registry, &options);
    let mut tokens = Vec::new();
    let mut scan = lexer.scan("(a(b)) q");

    let before = scan.stack().clone();
    lexer.step(&mut scan, &mut tokens).unwrap();
    assert_eq!(scan.stack().depth(), 2);
    assert_eq!(scan.stack().top(), table.state_id("paren").unwrap());

    while scan.stack().depth() > 1 {
        lexer.step(&mut scan, &mut tokens).unwrap();
    }
    assert_eq!(scan.stack(), &before);
    assert_eq!(scan.cursor(), "(a(b))".len());
    assert_eq!(
        tokens,
        vec![
            tok(TokenKind::Punctuation, "("),
            tok(TokenKind::LiteralString, "a"),
            tok(TokenKind::Punctuation, "("),
            tok(TokenKind::LiteralString, "b"),
            tok(TokenKind::Punctuation, ")"),
            tok(TokenKind::Punctuation, ")"),
        ]
    );
}

#[test]
fn cursor_advances_by_each_match() {
    let registry = registry();
    let table = registry.table("toy").unwrap();
    let options = Options::default();
    let lexer = Lexer::new(&table, &registry, &options);
    let input = "ab cd {1,2} (e)";
    let mut scan = lexer.scan(input);
    let mut consumed = 0;

    while !scan.is_done() {
        let mut tokens = Vec::new();
        let before = scan.cursor();
        lexer.step(&mut scan, &mut tokens).unwrap();
        assert!(scan.cursor() > before);
        consumed += scan.cursor() - before;
        let text: String = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(text, &input[before..scan.cursor()]);
    }
    assert_eq!(consumed, input.len());
}

#[test]
fn popping_the_root_is_an_error() {
    let err = run("ab )").unwrap_err();
    assert!(matches!(err, LexError::PopRoot { offset: 3 }));
}

#[test]
fn named_delegation_splices_tokens_in_order() {
    assert_eq!(
        run("q{1,23}r").unwrap(),
        vec![
            tok(TokenKind::Name, "q"),
            tok(TokenKind::Punctuation, "{"),
            tok(TokenKind::LiteralNumberInteger, "1"),
            tok(TokenKind::Punctuation, ","),
            tok(TokenKind::LiteralNumberInteger, "23"),
            tok(TokenKind::Punctuation, "}"),
            tok(TokenKind::Name, "r"),
        ]
    );
}

#[test]
fn empty_delegated_group_emits_nothing() {
    assert_eq!(run("{}").unwrap(), vec![tok(TokenKind::Punctuation, "{"), tok(TokenKind::Punctuation, "}")]);
}

#[test]
fn self_delegation_uses_a_fresh_stack() {
    // The child starts at root with its own stack; the parent's push/pop
    // pair leaves the parent stack as it was, so the trailing `ab` is still
    // a keyword.
    assert_eq!(
        run("<ab q>ab").unwrap(),
        vec![
            tok(TokenKind::Keyword, "ab"),
            tok(TokenKind::Text, " "),
            tok(TokenKind::Name, "q"),
            tok(TokenKind::Keyword, "ab"),
        ]
    );
}

#[test]
fn child_stall_reports_absolute_offset() {
    // `x` is not covered by Inner; it sits at byte 4 of the outer input.
    let err = run("q {1x}").unwrap_err();
    assert!(matches!(err, LexError::Stall { offset: 4, state: "root" }));
}

#[test]
fn child_failure_keeps_earlier_output() {
    let registry = registry();
    let table = registry.table("toy").unwrap();
    let options = Options::default();
    let mut tokens = Vec::new();
    let result = Lexer::new(&table, &registry, &options).run("q {1x}", &mut tokens);
    assert!(result.is_err());
    assert_eq!(
        tokens,
        vec![
            tok(TokenKind::Name, "q"),
            tok(TokenKind::Text, " "),
            tok(TokenKind::Punctuation, "{"),
            tok(TokenKind::LiteralNumberInteger, "1"),
        ]
    );
}

#[test]
fn unregistered_delegation_target_fails_the_run() {
    let mut registry = Registry::new();
    registry.register(LanguageDef { descriptor: &TOY, build: toy_table });
    let table = registry.table("toy").unwrap();
    let options = Options::default();
    let mut tokens = Vec::new();
    let err = Lexer::new(&table, &registry, &options).run("{1}", &mut tokens).unwrap_err();
    assert!(matches!(err, LexError::Build(BuildError::UnknownLanguage(ref name)) if name == "inner"));
}

#[test]
fn recursion_depth_is_bounded() {
    let options = Options { max_depth: 5, ..Options::default() };
    let err = run_with("Loopy", "spin", &options).unwrap_err();
    assert!(matches!(err, LexError::DepthExceeded { limit: 5, offset: 0 }));
}

#[test]
fn strict_and_lenient_stalls() {
    let err = run("ab#").unwrap_err();
    assert!(matches!(err, LexError::Stall { offset: 2, state: "root" }));

    let lenient = Options { stall: StallPolicy::Lenient, ..Options::default() };
    assert_eq!(
        run_with("toy", "ab#", &lenient).unwrap(),
        vec![tok(TokenKind::Keyword, "ab"), tok(TokenKind::Error, "#")]
    );
}

#[test]
fn metrics_include_child_runs() {
    let registry = registry();
    let table = registry.table("toy").unwrap();
    let options = Options::default();
    let mut tokens = Vec::new();
    let metrics = Lexer::new(&table, &registry, &options).run_with_metrics("<{1}>", &mut tokens).unwrap();

    assert_eq!(metrics.delegations, 2);
    assert_eq!(metrics.max_depth, 2);
    assert_eq!(metrics.tokens, 3);
    // outer `<...>`, child `{...}`, grandchild `1`
    assert_eq!(metrics.steps, 3);
}

#[test]
fn drive_finishes_a_partly_stepped_scan() {
    let registry = registry();
    let table = registry.table("toy").unwrap();
    let options = Options::default();
    let lexer = Lexer::new(&table, &registry, &options);
    let mut tokens = Vec::new();
    let mut scan = lexer.scan("ab {1} q");

    lexer.step(&mut scan, &mut tokens).unwrap();
    assert_eq!(scan.cursor(), 2);
    lexer.drive(&mut scan, &mut tokens).unwrap();

    assert!(scan.is_done());
    assert_eq!(scan.metrics().steps, 6);
    assert_eq!(tokens, run("ab {1} q").unwrap());
}
