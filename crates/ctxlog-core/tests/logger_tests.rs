#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::memory_logger;
use ctxlog_core::probe::StaticEnvironment;
use ctxlog_core::{kv, Level, RequestContext};
use serde_json::json;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::process::Command;
use std::sync::Arc;

#[test]
fn test_disabled_level_does_no_field_work() {
    // Given: A logger at info and a counting probe
    let (logger, sink, probe) = memory_logger(Level::Info);
    let ctx = RequestContext::from_trace_id("t-gate");

    // When: Every below-threshold style is invoked
    logger.debugf(&ctx, format_args!("{}", "skipped"));
    logger.debug(&ctx, &[&"skipped"]);
    logger.debugln(&ctx, &[&"skipped"]);
    logger.debugw(&ctx, "skipped", &kv!["k", 1]);
    logger.tracef(&ctx, format_args!("skipped"));

    // Then: Nothing was built, probed, memoized or written
    assert_eq!(logger.field_cache().builds(), 0);
    assert_eq!(probe.calls(), 0);
    assert!(ctx.prepared_entry().is_none());
    assert!(sink.is_empty());
}

#[test]
fn test_enabled_levels_reach_sink_with_severity() {
    let (logger, sink, _) = memory_logger(Level::Warn);
    let ctx = RequestContext::from_trace_id("t-levels");

    logger.infof(&ctx, format_args!("dropped"));
    logger.warnf(&ctx, format_args!("kept warn"));
    logger.errorf(&ctx, format_args!("kept error"));

    let levels: Vec<Level> = sink.records().iter().map(|r| r.level).collect();
    assert_eq!(levels, vec![Level::Warn, Level::Error]);
}

#[test]
fn test_message_styles() {
    // Given: A verbose logger
    let (logger, sink, _) = memory_logger(Level::Trace);
    let ctx = RequestContext::from_trace_id("t-styles");

    // When: The same operands go through each style
    logger.infof(&ctx, format_args!("{}, {}", "abc", 789));
    logger.info(&ctx, &[&"abc", &789]);
    logger.infoln(&ctx, &[&"abc", &789]);
    logger.infow(&ctx, "abc", &kv![]);
    logger.info(&ctx, &[&1, &2]);

    // Then: Each style renders its own way; plain style never adds separators
    let messages: Vec<String> = sink.records().into_iter().map(|r| r.message).collect();
    assert_eq!(messages, vec!["abc, 789", "abc789", "abc 789\n", "abc", "12"]);
}

#[test]
fn test_error_record_carries_caller_location() {
    // Given: A logger
    let (logger, sink, _) = memory_logger(Level::Trace);
    let ctx = RequestContext::from_trace_id("t-site");

    // When: errorf is called from this file
    let line = line!() + 1;
    logger.errorf(&ctx, format_args!("boom"));

    // Then: file and line point at the call, line as a string
    let fields = sink.last().unwrap().fields;
    assert_eq!(fields.get("file"), Some(&json!(file!())));
    assert_eq!(fields.get("line"), Some(&json!(line.to_string())));
}

#[test]
fn test_warn_and_below_carry_no_location() {
    let (logger, sink, _) = memory_logger(Level::Trace);
    let ctx = RequestContext::from_trace_id("t-nosite");

    logger.warnw(&ctx, "careful", &kv!["k", "v"]);

    let fields = sink.last().unwrap().fields;
    assert!(!fields.contains_key("file"));
    assert!(!fields.contains_key("line"));
}

#[test]
fn test_errorw_combines_fields_and_location() {
    let (logger, sink, _) = memory_logger(Level::Trace);
    let ctx = RequestContext::from_trace_id("t-errorw").with_user_id(9);

    logger.errorw(&ctx, "payment failed", &kv!["order_id", 5, "amount", 12.5]);

    let record = sink.last().unwrap();
    assert_eq!(record.message, "payment failed");
    assert_eq!(record.fields.get("order_id"), Some(&json!(5)));
    assert_eq!(record.fields.get("amount"), Some(&json!(12.5)));
    assert_eq!(record.fields.get("uid"), Some(&json!(9)));
    assert_eq!(record.fields.get("file"), Some(&json!(file!())));
}

#[test]
fn test_panic_logs_then_unwinds_with_message() {
    // Given: A logger whose threshold excludes everything but fatal and panic
    let (logger, sink, _) = memory_logger(Level::Panic);
    let ctx = RequestContext::from_trace_id("t-panic");

    // When: panicf is invoked
    let outcome = catch_unwind(AssertUnwindSafe(|| {
        logger.panicf(&ctx, format_args!("invariant {} broken", 7));
    }));

    // Then: The record was written before unwinding with the same message
    let payload = outcome.expect_err("panicf must unwind");
    let text = payload
        .downcast_ref::<String>()
        .cloned()
        .expect("panic payload is the message");
    assert_eq!(text, "invariant 7 broken");

    let record = sink.last().unwrap();
    assert_eq!(record.level, Level::Panic);
    assert_eq!(record.message, "invariant 7 broken");
    assert!(record.fields.contains_key("file"));
}

#[test]
#[should_panic(expected = "bad state")]
fn test_panicw_panics() {
    let (logger, _, _) = memory_logger(Level::Info);
    logger.panicw(&RequestContext::new(), "bad state", &kv!["k", 1]);
}

#[test]
fn test_condition_fatal_false_logs_error() {
    let (logger, sink, _) = memory_logger(Level::Trace);
    let ctx = RequestContext::from_trace_id("t-cond");

    logger.condition_fatalf(&ctx, false, format_args!("recoverable {}", 1));

    let record = sink.last().unwrap();
    assert_eq!(record.level, Level::Error);
    assert_eq!(record.message, "recoverable 1");
    assert_eq!(record.fields.get("file"), Some(&json!(file!())));
}

#[test]
fn test_prod_fatal_outside_production_logs_error() {
    // Given: A QA environment
    let (logger, sink, _) = memory_logger(Level::Trace);
    let logger = logger.with_environment(Arc::new(StaticEnvironment::qa()));
    let ctx = RequestContext::from_trace_id("t-prod");

    // When: prod_fatal is called
    logger.prod_fatal(&ctx, &[&"disk ", &"full"]);

    // Then: It degrades to an error record
    let record = sink.last().unwrap();
    assert_eq!(record.level, Level::Error);
    assert_eq!(record.message, "disk full");
}

const FATAL_CHILD_ENV: &str = "CTXLOG_FATAL_CHILD";

/// Sink that prints each record to stderr so the parent process can see it
struct StderrSink;

impl ctxlog_core::sink::Sink for StderrSink {
    fn write(&self, level: Level, message: &str, fields: &ctxlog_core::Fields) {
        eprintln!("RECORD {} {} {}", level, message, fields);
    }
}

#[test]
fn test_fatal_logs_then_exits_with_status_one() {
    if std::env::var_os(FATAL_CHILD_ENV).is_some() {
        let logger = ctxlog_core::Logger::new(Level::Panic, Arc::new(StderrSink));
        let ctx = RequestContext::from_trace_id("t-fatal");
        logger.fatalf(&ctx, format_args!("shutting {}", "down"));
    }

    // Given: This test re-run as a child process
    let exe = std::env::current_exe().unwrap();

    // When: The child logs at fatal
    let output = Command::new(exe)
        .args([
            "test_fatal_logs_then_exits_with_status_one",
            "--exact",
            "--nocapture",
            "--test-threads=1",
        ])
        .env(FATAL_CHILD_ENV, "1")
        .output()
        .unwrap();

    // Then: The record was written and the exit status is 1
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(output.status.code(), Some(1), "stderr: {}", stderr);
    assert!(stderr.contains("RECORD fatal shutting down"), "stderr: {}", stderr);
    assert!(stderr.contains(r#""traceId":"t-fatal""#), "stderr: {}", stderr);
}

#[test]
fn test_qa_or_prod_fatal_in_development_logs_error() {
    let (logger, sink, _) = memory_logger(Level::Trace);
    let logger = logger.with_environment(Arc::new(StaticEnvironment::development()));

    logger.qa_or_prod_fatalln(&RequestContext::new(), &[&"a", &"b"]);

    let record = sink.last().unwrap();
    assert_eq!(record.level, Level::Error);
    assert_eq!(record.message, "a b\n");
}
