/// Builds a [`Bdir`](crate::Bdir) from a literal mixing both directions.
///
/// `Name = code` declares a code; `code => "label"` overrides the label of a
/// declared code. Raw identifiers lose their prefix, so `r#type = 1` declares
/// the name `"type"`. The two kinds may be interleaved in any order. Expands
/// to a `Result<Bdir, BdirError>`.
///
/// # Examples
///
/// ```
/// use bdir::bdir;
///
/// let roles = bdir! {
///     None = 0,
///     User = 1,
///     Admin = 2,
///     0 => "",
///     2 => "Administrator",
/// }
/// .unwrap();
///
/// assert_eq!(roles.get("Admin"), Some(2.0));
/// assert_eq!(roles.render(2.0), "Administrator");
/// assert_eq!(roles.render(1.0), "User");
/// ```
#[macro_export]
macro_rules! bdir {
    (@entries [$($entry:expr,)*]) => {{
        let entries: ::std::vec::Vec<$crate::Entry> = ::std::vec![$($entry),*];
        $crate::Bdir::new(entries)
    }};
    (@entries [$($entry:expr,)*] $name:ident = $code:expr $(, $($rest:tt)*)?) => {
        $crate::bdir!(@entries [
            $($entry,)*
            $crate::Entry::forward(
                ::std::stringify!($name).trim_start_matches("r#"),
                $code as f64,
            ),
        ] $($($rest)*)?)
    };
    (@entries [$($entry:expr,)*] $code:literal => $label:expr $(, $($rest:tt)*)?) => {
        $crate::bdir!(@entries [
            $($entry,)*
            $crate::Entry::label($code as f64, $label),
        ] $($($rest)*)?)
    };
    ($($body:tt)*) => {
        $crate::bdir!(@entries [] $($body)*)
    };
}
