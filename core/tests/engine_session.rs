// core/tests/engine_session.rs
//
// End-to-end tests against a scripted engine process.
//
// The engine is a small `sh` script: it echoes each request line back as a
// non-K line (which the pad ignores) and answers every blank line with a
// K-line chosen by how many strokes it received.

#![cfg(unix)]

use std::process::{Command, Stdio};
use std::time::Duration;

use kanjipad_core::{
    CharacterCode, EngineCommand, EngineSession, Error, Pad, PadEvent, PadResult, Point,
    RequestSink, Selection,
};

const SCRIPT: &str = r#"
echo "fake engine ready"
n=0
while IFS= read -r line; do
    if [ -z "$line" ]; then
        if [ "$n" -eq 1 ]; then echo "K 8141"; else echo "K 3021 3022"; fi
        n=0
    else
        echo "R:$line"
        n=$((n + 1))
    fi
done
"#;

const TIMEOUT: Duration = Duration::from_secs(10);

fn start_script(script: &str) -> EngineSession {
    let command = EngineCommand::new("sh").arg("-c").arg(script);
    EngineSession::start(&command).unwrap()
}

/// Feed engine lines to the pad until one of them changes it.
fn pump_until_changed(engine: &EngineSession, pad: &mut Pad, seen: &mut Vec<String>) {
    loop {
        let line = engine
            .next_line_timeout(TIMEOUT)
            .unwrap()
            .expect("engine did not answer in time");
        seen.push(line.clone());
        if pad.handle(PadEvent::EngineLine(line)) == PadResult::Changed {
            return;
        }
    }
}

fn draw(pad: &mut Pad, points: &[(i32, i32)]) {
    pad.handle(PadEvent::PenDown(Point::new(points[0].0, points[0].1)));
    for &(x, y) in &points[1..] {
        pad.handle(PadEvent::PenMove(Point::new(x, y)));
    }
    pad.handle(PadEvent::PenUp);
}

#[test]
fn test_lookup_round_trip() {
    let mut engine = start_script(SCRIPT);
    let mut pad = Pad::new();
    draw(&mut pad, &[(0, 0), (5, 5)]);

    let PadResult::Request(request) = pad.handle(PadEvent::Lookup) else {
        panic!("lookup with strokes must produce a request");
    };
    engine.send_request(&request).unwrap();

    let mut seen = Vec::new();
    pump_until_changed(&engine, &mut pad, &mut seen);

    // banner and echo were ignored, the K-line was taken
    assert_eq!(seen[0], "fake engine ready\n");
    assert!(seen.contains(&"R:0 0 5 5 \n".to_string()));
    assert_eq!(pad.guesses().codes(), &[CharacterCode::new(0x81, 0x41)]);

    pad.handle(PadEvent::Pick(0));
    assert_eq!(
        pad.selection().state(),
        Selection::Selected(CharacterCode::new(0x81, 0x41))
    );
}

#[test]
fn test_second_lookup_replaces_guesses() {
    let mut engine = start_script(SCRIPT);
    let mut pad = Pad::new();
    let mut seen = Vec::new();

    draw(&mut pad, &[(0, 0), (5, 5)]);
    if let PadResult::Request(request) = pad.handle(PadEvent::Lookup) {
        engine.send_request(&request).unwrap();
    }
    pump_until_changed(&engine, &mut pad, &mut seen);
    pad.handle(PadEvent::Pick(0));
    assert!(pad.has_selection());

    draw(&mut pad, &[(10, 0), (10, 20)]);
    if let PadResult::Request(request) = pad.handle(PadEvent::Lookup) {
        engine.send_request(&request).unwrap();
    }
    pump_until_changed(&engine, &mut pad, &mut seen);

    assert_eq!(pad.guesses().len(), 2);
    assert_eq!(pad.guesses().get(0), Some(CharacterCode::new(0x30, 0x21)));
    assert!(!pad.has_selection());
    assert_eq!(pad.selection_text(), None);
}

#[test]
fn test_engine_exit_is_fatal() {
    let mut engine = start_script("exit 0");

    let err = engine.next_line_timeout(TIMEOUT).unwrap_err();
    assert!(matches!(err, Error::EngineClosed));
    assert!(err.is_fatal());

    // nobody reads the request pipe any more
    let err = engine.send_request(b"0 0 \n\n").unwrap_err();
    assert!(err.is_fatal());
}

#[test]
fn test_missing_engine_reports_program() {
    let command = EngineCommand::kpengine("/nonexistent/kanjipad/kpengine", None);
    let err = EngineSession::start(&command).err().expect("launch should fail");
    assert!(err.is_fatal());
    assert!(err
        .to_string()
        .starts_with("could not start engine '/nonexistent/kanjipad/kpengine'"));
}

#[test]
fn test_non_utf8_engine_output_is_replaced() {
    let mut engine = start_script(r"printf 'X\377\376\nK 3021 \377\n'; cat > /dev/null");
    let mut pad = Pad::new();

    let banner = engine.next_line_timeout(TIMEOUT).unwrap().unwrap();
    assert_eq!(banner, "X\u{FFFD}\u{FFFD}\n");
    assert_eq!(pad.handle(PadEvent::EngineLine(banner)), PadResult::Unchanged);

    let guesses = engine.next_line_timeout(TIMEOUT).unwrap().unwrap();
    assert_eq!(guesses, "K 3021 \u{FFFD}\n");
    assert_eq!(pad.handle(PadEvent::EngineLine(guesses)), PadResult::Changed);
    assert_eq!(pad.guesses().codes(), &[CharacterCode::new(0x30, 0x21)]);

    // the session is still usable afterwards
    engine.send_request(b"0 0 \n\n").unwrap();
}

/// Whether a process with this id still exists.
fn process_exists(pid: u32) -> bool {
    Command::new("kill")
        .arg("-0")
        .arg(pid.to_string())
        .stderr(Stdio::null())
        .status()
        .map(|status| status.success())
        .unwrap_or(false)
}

#[test]
fn test_drop_reaps_engine_that_exits_on_eof() {
    // reads until stdin closes, then exits by itself
    let engine = start_script("cat > /dev/null");
    let pid = engine.pid();
    assert!(process_exists(pid));

    drop(engine);
    assert!(!process_exists(pid));
}

#[test]
fn test_drop_kills_engine_that_ignores_eof() {
    // never reads stdin; only the kill ends it
    let engine = start_script("exec sleep 600");
    let pid = engine.pid();
    assert!(process_exists(pid));

    drop(engine);
    assert!(!process_exists(pid));
}
