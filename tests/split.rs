use sql_batch::{flatten_continuations, split};

#[test]
fn batch_split() {
    let list: &[(&str, &[&str])] = &[
        (
            "use DB\ngo\nselect 1\ngo\nselect 2\n",
            &["use DB\n", "\nselect 1\n", "\nselect 2\n"],
        ),
        ("go\nuse DB go\n", &["\nuse DB go\n"]),
        (
            "select 'It''s go time'\ngo\nselect top 1 1",
            &["select 'It''s go time'\n", "\nselect top 1 1"],
        ),
        (
            "select 1 /* go */\ngo\nselect top 1 1",
            &["select 1 /* go */\n", "\nselect top 1 1"],
        ),
        (
            "select 1 -- go\ngo\nselect top 1 1",
            &["select 1 -- go\n", "\nselect top 1 1"],
        ),
        ("\"0'\"", &["\"0'\""]),
        ("0'", &["0'"]),
        ("--", &["--"]),
        ("GO", &[]),
        ("/*", &["/*"]),
        (
            "select 1;\nGO  2\nselect 2;",
            &["select 1;\n", "select 1;\n", "\nselect 2;"],
        ),
        ("select 'hi\\\n-hello';", &["select 'hi-hello';"]),
        ("select 'hi\\\r\n-hello';", &["select 'hi-hello';"]),
        ("select 'hi\\\r-hello';", &["select 'hi-hello';"]),
        ("select 'hi\\\n\nhello';", &["select 'hi\nhello';"]),
    ];

    for (i, (sql, expect)) in list.iter().enumerate() {
        let got = split(sql, "go");
        assert_eq!(&got, expect, "test item {i}: {sql:?}");
    }
}

#[test]
fn split_separator() {
    assert_eq!(split("GO", ""), ["GO"]);
    assert_eq!(split("GO", "SELECT"), ["GO"]);
    assert!(split("", "").is_empty());
}

/// Dropping repeat duplicates, the batch bodies concatenate back to the
/// normalized input minus the separator-word lines (the separator line's
/// terminator survives, it opens the next batch).
#[test]
fn bodies_reassemble_the_input() {
    let inputs = [
        (
            "use DB\ngo\nselect 1\ngo\nselect 2\n",
            "use DB\n\nselect 1\n\nselect 2\n",
        ),
        (
            "select 'It''s go time'\ngo\nselect top 1 1",
            "select 'It''s go time'\n\nselect top 1 1",
        ),
        ("a\r\nGO 3\r\nb", "a\r\n\r\nb"),
        ("select 'hi\\\n-hello';", "select 'hi-hello';"),
    ];
    for (sql, expect) in inputs {
        let mut batches = split(sql, "go");
        batches.dedup();
        assert_eq!(batches.concat(), expect, "input {sql:?}");
        // and the bodies are substrings of the normalized text, in order
        let normalized = flatten_continuations(sql);
        let mut from = 0;
        for body in split(sql, "go") {
            if let Some(at) = normalized[from..].find(&body) {
                from += at;
            } else {
                panic!("batch {body:?} not found in {normalized:?}");
            }
        }
    }
}
