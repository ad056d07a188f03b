use std::io::Write;
use std::process::{Command, Output, Stdio};

fn json_poly(args: &[&str], stdin: &str) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_json-poly"))
        .args(args)
        .env("RUST_LOG", "off")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();
    // commands that never read stdin may exit before the write lands
    let _ = child.stdin.take().unwrap().write_all(stdin.as_bytes());
    child.wait_with_output().unwrap()
}

fn stdout(output: &Output) -> String { String::from_utf8_lossy(&output.stdout).into_owned() }
fn stderr(output: &Output) -> String { String::from_utf8_lossy(&output.stderr).into_owned() }

#[test]
fn normalize_keeps_literals_and_order() {
    let out = json_poly(&["normalize", "-i", "-"], "{ \"z\": 1.50, \"a\": [ true, null ] }");
    assert!(out.status.success(), "{}", stderr(&out));
    assert_eq!(stdout(&out), "{\"z\":1.50,\"a\":[true,null]}\n");
}

#[test]
fn narrow_over_ndjson_counts_failures() {
    let out = json_poly(&["narrow", "--as", "string-or-array", "--ndjson", "-i", "-"], "\"a\"\n[\"a\",\"b\"]\n3\nnull\n");
    assert!(!out.status.success());
    assert_eq!(stdout(&out), "[\"a\"]\n[\"a\",\"b\"]\n[]\n");
    assert!(stderr(&out).contains("<stdin>#3: unexpected type"), "{}", stderr(&out));
}

#[test]
fn decode_through_a_pointer_from_files() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("doc.json");
    std::fs::write(
        &path,
        r#"{"service":[{"id":"s","type":["LinkedDomains"],"serviceEndpoint":["https://a"]}]}"#,
    )
    .unwrap();
    let out_path = dir.path().join("nested/out.json");

    let out = json_poly(
        &[
            "decode",
            "--model",
            "service",
            "--json-pointer",
            "/service/0",
            "-i",
            path.to_str().unwrap(),
            "-o",
            out_path.to_str().unwrap(),
        ],
        "",
    );
    assert!(out.status.success(), "{}", stderr(&out));
    assert_eq!(
        std::fs::read_to_string(&out_path).unwrap(),
        "{\"id\":\"s\",\"type\":\"LinkedDomains\",\"serviceEndpoint\":[\"https://a\"]}\n"
    );
}

#[test]
fn unknown_model_is_fatal() {
    let out = json_poly(&["decode", "--model", "nope", "-i", "-"], "{}");
    assert!(!out.status.success());
    assert!(stderr(&out).contains("unknown model `nope`"), "{}", stderr(&out));
}

#[test]
fn strict_duplicate_keys_fail_the_document() {
    let out = json_poly(&["normalize", "--reject-duplicate-keys", "-i", "-"], "{\"a\":1,\"a\":2}");
    assert!(!out.status.success());
    assert!(stderr(&out).contains("duplicate object key"), "{}", stderr(&out));

    let out = json_poly(&["normalize", "-i", "-"], "{\"a\":1,\"a\":2}");
    assert_eq!(stdout(&out), "{\"a\":2}\n");
}

#[test]
fn models_lists_registered_ids() {
    let out = json_poly(&["models"], "");
    assert!(out.status.success());
    assert!(stdout(&out).lines().any(|l| l == "service"));
}
