// src/macros.rs
#[macro_export]
macro_rules! s {
    // String shorthand!

    // Zero-arg → String::new()
    () => {
        ::std::string::String::new()
    };
    // Any single expression — works for literals, consts, or vars
    ($expr:expr) => {
        ::std::string::String::from($expr)
    };
}

#[macro_export]
macro_rules! record {
    // Record shorthand!
    //   record! { "app_id" => id, "category" => cat }
    // Field order is the order written here (and the header order on first append).
    ($($field:expr => $value:expr),* $(,)?) => {{
        #[allow(unused_mut)]
        let mut r = $crate::store::Record::new();
        $(
            r.set($field, $value);
        )*
        r
    }};
}
