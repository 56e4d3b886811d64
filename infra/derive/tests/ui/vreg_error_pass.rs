use std::borrow::Cow;
use vreg_derive::vreg_error;

#[vreg_error]
pub enum DemoError {
    #[error("IO error{}: {source}", format_context(.context))]
    Io {
        #[source]
        source: std::io::Error,
        context: Option<Cow<'static, str>>,
    },

    #[error("Rejected{}: {message}", format_context(.context))]
    PlateRejected { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Internal error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

fn read() -> Result<(), DemoError> {
    Err(std::io::Error::other("boom")).context("reading plate list")
}

fn main() {
    let err = read().unwrap_err();
    assert_eq!(err.kind(), "io");
    assert!(err.to_string().contains("(reading plate list)"));

    let err: DemoError = "unexpected".into();
    assert_eq!(err.kind(), "internal");

    let err = DemoError::PlateRejected { message: "bad".into(), context: None };
    assert_eq!(err.kind(), "plate_rejected");
}
