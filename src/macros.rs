/// Declare one rule of a table: `rule!(pattern => behavior)`.
///
/// `pattern` is anything convertible into a `String` (a literal or a
/// `format!` result); it is compiled when the table is built.
#[macro_export]
macro_rules! rule {
    ($pat:expr => $behavior:expr $(,)?) => {
        $crate::engine::RuleSpec::new($pat, $behavior)
    };
}
