//! Property tests: lossless printing reproduces generated programs exactly

use proptest::prelude::*;
use tacoscript::{parse, print, ParseOptions, PrintOptions};

fn identifier() -> impl Strategy<Value = String> {
    "[xyz][0-9]{0,3}"
}

fn operator() -> impl Strategy<Value = &'static str> {
    prop_oneof![
        Just("+"),
        Just("-"),
        Just("*"),
        Just("=="),
        Just("<"),
        Just("or"),
        Just("and"),
    ]
}

fn spaces() -> impl Strategy<Value = String> {
    (1usize..4).prop_map(|n| " ".repeat(n))
}

/// `x0 + y  or z`, with varying space around each operator
fn binary_chain() -> impl Strategy<Value = String> {
    (
        identifier(),
        prop::collection::vec((spaces(), operator(), spaces(), identifier()), 0..4),
    )
        .prop_map(|(first, rest)| {
            let mut line = first;
            for (before, op, after, operand) in rest {
                line.push_str(&before);
                line.push_str(op);
                line.push_str(&after);
                line.push_str(&operand);
            }
            line
        })
}

fn line() -> impl Strategy<Value = String> {
    (
        binary_chain(),
        prop::option::of("[a-z ]{0,10}"),
        prop::bool::ANY,
    )
        .prop_map(|(code, comment, blank_after)| {
            let mut line = code;
            if let Some(comment) = comment {
                line.push_str(" #");
                line.push_str(comment.trim_end());
            }
            line.push('\n');
            if blank_after {
                line.push('\n');
            }
            line
        })
}

fn program() -> impl Strategy<Value = String> {
    prop::collection::vec(line(), 1..6).prop_map(|lines| lines.concat())
}

proptest! {
    #[test]
    fn lossless_print_is_identity(source in program()) {
        let file = parse(&source, &ParseOptions::default()).unwrap();
        let output = print(&file, &source, &PrintOptions::default()).unwrap();
        prop_assert_eq!(output.code, source);
    }

    #[test]
    fn reformat_is_idempotent(source in program()) {
        let file = parse(&source, &ParseOptions::default()).unwrap();
        let once = print(&file, &source, &PrintOptions::reformat()).unwrap().code;

        let again = parse(&once, &ParseOptions::default()).unwrap();
        let twice = print(&again, &once, &PrintOptions::reformat()).unwrap().code;
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn every_comment_is_attached(source in program()) {
        let file = parse(&source, &ParseOptions::default()).unwrap();
        prop_assert_eq!(file.program.attached_comment_count(), file.comments.len());
    }
}
