//! Java.
//!
//! Three states:
//!
//! - `root`: everything, in the priority order below.
//! - `class`: entered after `class`/`interface`; emits whitespace, then one
//!   identifier as `Name.Class`, then pops.
//! - `import`: entered after `import`; emits whitespace, then one dotted path
//!   (optionally ending in `*`) as `Name.Namespace`, then pops.
//!
//! The first root rule recognises a method signature (modifier/type words, a
//! name, `(`) and hands the word run back to a fresh Java lexer instead of
//! repeating the keyword rules for it.

use crate::engine::{Action, Behavior, LanguageDescriptor, ROOT, RuleTable, Target, words};
use crate::error::BuildError;
use crate::languages::LanguageDef;
use crate::token::TokenKind::*;


pub static DESCRIPTOR: LanguageDescriptor = LanguageDescriptor {
    name: "Java",
    aliases: &["java"],
    filenames: &["*.java"],
    mimetypes: &["text/x-java"],
    description: "The Java programming language (java.com)",
};

pub static LANGUAGE: LanguageDef = LanguageDef { descriptor: &DESCRIPTOR, build: table };

const CLASS: &str = "class";
const IMPORT: &str = "import";

const ID: &str = "[a-zA-Z_][a-zA-Z0-9_]*";

const KEYWORDS: &[&str] = &[
    "assert", "break", "case", "catch", "continue", "default", "do", "else", "finally", "for", "if", "goto",
    "instanceof", "new", "return", "switch", "this", "throw", "try", "while",
];

const DECLARATIONS: &[&str] = &[
    "abstract", "const", "enum", "extends", "final", "implements", "native", "private", "protected", "public",
    "static", "strictfp", "super", "synchronized", "throws", "transient", "volatile",
];

const TYPES: &[&str] = &["boolean", "byte", "char", "double", "float", "int", "long", "short", "void"];

/// Build the Java rule table.
pub fn table() -> Result<RuleTable, BuildError> {
    RuleTable::builder(&DESCRIPTOR)
        .state(
            ROOT,
            vec![
                // modifiers/return type, method name, optional space, open paren
                rule!(
                    r"^(\s*(?:[A-Za-z_][0-9A-Za-z_.\[\]]*\s+)+?)([A-Za-z_][0-9A-Za-z_]*)(\s*)(\()" =>
                    Behavior::Composite(vec![
                        Action::delegate(1, Target::Current),
                        Action::emit(2, NameFunction),
                        Action::emit(3, Text),
                        Action::emit(4, Punctuation),
                    ])
                ),
                rule!(r"\s+" => Behavior::Emit(Text)),
                rule!(r"//.*?$" => Behavior::Emit(CommentSingle)),
                rule!(r"(?s:/\*.*?\*/)" => Behavior::Emit(CommentMultiline)),
                rule!(format!("@{ID}") => Behavior::Emit(NameDecorator)),
                rule!(words(KEYWORDS) => Behavior::Emit(Keyword)),
                rule!(words(DECLARATIONS) => Behavior::Emit(KeywordDeclaration)),
                rule!(words(TYPES) => Behavior::Emit(KeywordType)),
                rule!(r"package\b" => Behavior::Emit(KeywordNamespace)),
                rule!(r"(?:true|false|null)\b" => Behavior::Emit(KeywordConstant)),
                rule!(r"(?:class|interface)\b" => Behavior::EmitAndPush(KeywordDeclaration, CLASS)),
                rule!(r"import\b" => Behavior::EmitAndPush(KeywordNamespace, IMPORT)),
                rule!(r#""(?:\\.|[^"\\])*""# => Behavior::Emit(LiteralString)),
                rule!(r"'(?:\\u[0-9a-fA-F]{4}|\\.|[^\\'])'" => Behavior::Emit(LiteralStringChar)),
                rule!(
                    format!(r"(\.)({ID})") =>
                    Behavior::Composite(vec![Action::emit(1, Operator), Action::emit(2, NameAttribute)])
                ),
                rule!(format!("{ID}:") => Behavior::Emit(NameLabel)),
                rule!(format!(r"\$?{ID}") => Behavior::Emit(Name)),
                rule!(r"[(){}\[\];,]" => Behavior::Emit(Punctuation)),
                rule!(r"[~^*!%&<>|+=:./?-]" => Behavior::Emit(Operator)),
                rule!(r"[0-9][0-9]*\.[0-9]+(?:[eE][0-9]+)?[fd]?" => Behavior::Emit(LiteralNumber)),
                rule!(r"0x[0-9a-fA-F]+" => Behavior::Emit(LiteralNumberHex)),
                rule!(r"[0-9]+L?" => Behavior::Emit(LiteralNumberInteger)),
            ],
        )
        .state(CLASS, vec![rule!(r"\s+" => Behavior::Emit(Text)), rule!(ID => Behavior::EmitAndPop(NameClass))])
        .state(
            IMPORT,
            vec![
                rule!(r"\s+" => Behavior::Emit(Text)),
                rule!(r"[a-zA-Z0-9_.]+\*?" => Behavior::EmitAndPop(NameNamespace)),
            ],
        )
        .build()
}
