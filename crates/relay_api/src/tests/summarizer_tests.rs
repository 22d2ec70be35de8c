use super::*;

use std::time::Instant;

fn shell(script: &str) -> ProcessSummarizer {
    ProcessSummarizer::new("sh").arg("-c").arg(script)
}

#[cfg(unix)]
#[tokio::test]
async fn trims_collected_stdout() {
    let summarizer = shell("cat >/dev/null; printf '  hello world  \\n'");
    let summary = summarizer.summarize("anything").await.expect("summary");
    assert_eq!(summary, "hello world");
}

#[cfg(unix)]
#[tokio::test]
async fn writes_single_json_document_then_closes_stdin() {
    // `cat` only exits once stdin reaches EOF.
    let summarizer = shell("cat");
    let echoed = summarizer
        .summarize("line one\nline \"two\"")
        .await
        .expect("echo");
    let decoded: SummarizeRequest = serde_json::from_str(&echoed).expect("json");
    assert_eq!(decoded.text, "line one\nline \"two\"");
}

#[cfg(unix)]
#[tokio::test]
async fn forwards_empty_text_as_is() {
    let summarizer = shell("cat");
    let echoed = summarizer.summarize("").await.expect("echo");
    assert_eq!(echoed, r#"{"text":""}"#);
}

#[cfg(unix)]
#[tokio::test]
async fn non_zero_exit_is_failure_even_with_stdout() {
    let summarizer = shell("cat >/dev/null; echo partial; echo boom >&2; exit 1");
    let err = summarizer
        .summarize("text")
        .await
        .expect_err("should fail");
    match err {
        SummarizeError::NonZeroExit { code, stderr } => {
            assert_eq!(code, Some(1));
            assert!(stderr.contains("boom"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[cfg(unix)]
#[tokio::test]
async fn hung_process_times_out() {
    let summarizer = shell("sleep 5").with_timeout(Some(Duration::from_millis(200)));
    let started = Instant::now();
    let err = summarizer
        .summarize("text")
        .await
        .expect_err("should time out");
    assert!(err.is_timeout());
    assert!(started.elapsed() < Duration::from_secs(4));
}

#[cfg(unix)]
#[tokio::test]
async fn process_that_ignores_input_still_succeeds() {
    let summarizer = shell("printf done");
    let large = "x".repeat(1024 * 1024);
    let summary = summarizer.summarize(&large).await.expect("summary");
    assert_eq!(summary, "done");
}

#[tokio::test]
async fn missing_program_reports_spawn_failure() {
    let summarizer = ProcessSummarizer::new("definitely-not-a-summarizer-binary");
    let err = summarizer
        .summarize("text")
        .await
        .expect_err("should fail");
    assert!(matches!(err, SummarizeError::Spawn { .. }));
    assert!(!err.is_timeout());
}
