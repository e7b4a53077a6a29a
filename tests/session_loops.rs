//! End-to-end runs of the application loops with an in-memory display.

use crossbeam_channel::unbounded;
use pocket_writer::actor::{run_chat, run_editor, RenderCommand, RendererActor, ScriptedSource};
use pocket_writer::view::Frame;
use pocket_writer::display::FrameLog;
use pocket_writer::session::LoadStatus;
use pocket_writer::{
    ChatSession, Config, EditSession, InputEvent, LoopExit, MemoryDisplay, SessionState,
};
use std::fs;
use std::thread;
use std::time::{Duration, Instant};

fn immediate_config() -> Config {
    Config {
        buffer_interval_ms: 0,
        ..Config::with_grid(18, 5)
    }
}

fn type_text(tx: &crossbeam_channel::Sender<InputEvent>, text: &str) {
    for c in text.chars() {
        let event = if c == '\n' {
            InputEvent::Enter
        } else {
            InputEvent::Char(c)
        };
        tx.send(event).unwrap();
    }
}

fn paint_frame(command: RenderCommand) -> Frame {
    match command {
        RenderCommand::Paint(frame) => frame,
        other => panic!("expected a paint command, got {other:?}"),
    }
}

fn wait_for(log: &FrameLog, needle: &str) -> bool {
    let deadline = Instant::now() + Duration::from_secs(5);
    while Instant::now() < deadline {
        if log
            .last()
            .is_some_and(|f| f.lines.iter().any(|l| l.contains(needle)))
        {
            return true;
        }
        thread::sleep(Duration::from_millis(5));
    }
    false
}

#[test]
fn test_edit_existing_file_and_save() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notes.txt");
    fs::write(&path, "ab").unwrap();

    let config = immediate_config();
    let mut session = EditSession::new(&config);
    assert!(matches!(session.open(&path).unwrap(), LoadStatus::Loaded));

    let (input_tx, input_rx) = unbounded();
    let (render_tx, render_rx) = unbounded();
    let (display, log) = MemoryDisplay::new(18, 5);
    let renderer = RendererActor::spawn(render_rx, display).unwrap();

    type_text(&input_tx, "\ncd");
    input_tx.send(InputEvent::Save).unwrap();

    let exit = run_editor(&mut session, &input_rx, Duration::ZERO, &render_tx).unwrap();
    drop(render_tx);
    renderer.join();

    assert_eq!(exit, LoopExit::Saved);
    assert_eq!(session.state(), SessionState::Idle);
    assert_eq!(fs::read_to_string(&path).unwrap(), "ab\ncd");

    let last = log.last().unwrap();
    assert_eq!(last.lines, vec!["ab".to_string(), "cd".to_string()]);
}

#[test]
fn test_batched_edits_are_not_painted_before_tick() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("draft.txt");

    let config = Config {
        buffer_interval_ms: 60_000,
        ..Config::with_grid(18, 5)
    };
    let mut session = EditSession::new(&config);
    session.new_document(&path).unwrap();

    let (input_tx, input_rx) = unbounded();
    let (render_tx, render_rx) = unbounded();
    type_text(&input_tx, "hello");
    input_tx.send(InputEvent::Save).unwrap();

    let exit = run_editor(&mut session, &input_rx, config.buffer_interval(), &render_tx).unwrap();
    assert_eq!(exit, LoopExit::Saved);

    // Only the opening frame: keystrokes waited for a tick that never came.
    assert_eq!(render_rx.try_iter().count(), 1);
    // Saving still flushed them.
    assert_eq!(fs::read_to_string(&path).unwrap(), "hello");
}

#[test]
fn test_scroll_keys_paint_without_waiting_for_tick() {
    let config = Config {
        buffer_interval_ms: 60_000,
        ..Config::with_grid(18, 2)
    };
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("long.txt");
    fs::write(&path, "one\ntwo\nthree\nfour").unwrap();

    let mut session = EditSession::new(&config);
    session.open(&path).unwrap();

    let (input_tx, input_rx) = unbounded();
    let (render_tx, render_rx) = unbounded();
    input_tx.send(InputEvent::ScrollUp).unwrap();
    input_tx.send(InputEvent::Cancel).unwrap();

    let exit = run_editor(&mut session, &input_rx, config.buffer_interval(), &render_tx).unwrap();
    assert_eq!(exit, LoopExit::Discarded);

    let frames: Vec<_> = render_rx.try_iter().map(paint_frame).collect();
    assert_eq!(frames.len(), 2);
    assert_eq!(frames[0].lines, vec!["three".to_string(), "four".to_string()]);
    assert_eq!(frames[1].lines, vec!["two".to_string(), "three".to_string()]);
    assert_eq!(frames[1].offset, 1);
}

#[test]
fn test_failed_save_shows_notice_and_keeps_document() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("out.txt");

    let config = immediate_config();
    let mut session = EditSession::new(&config);
    session.new_document(&path).unwrap();

    let (input_tx, input_rx) = unbounded();
    let (render_tx, render_rx) = unbounded();
    type_text(&input_tx, "keep");
    input_tx.send(InputEvent::Save).unwrap();
    input_tx.send(InputEvent::Char('!')).unwrap();
    drop(input_tx);

    let exit = run_editor(&mut session, &input_rx, Duration::ZERO, &render_tx).unwrap();
    assert_eq!(exit, LoopExit::InputClosed);
    assert_eq!(session.state(), SessionState::Editing);
    assert_eq!(session.document().text(), "keep!");

    let frames: Vec<_> = render_rx.try_iter().map(paint_frame).collect();
    let notice = frames
        .iter()
        .position(|f| f.lines.first().is_some_and(|l| l.starts_with("[Error]")))
        .expect("a notice frame");
    // The document comes back after the next key.
    assert_eq!(frames[notice + 1].lines, vec!["keep!".to_string()]);
}

#[test]
fn test_chat_round_trip() {
    let config = immediate_config();
    let (input_tx, input_rx) = unbounded();
    let (render_tx, render_rx) = unbounded();
    let (display, log) = MemoryDisplay::new(18, 5);
    let renderer = RendererActor::spawn(render_rx, display).unwrap();

    let worker = thread::spawn(move || {
        let mut chat = ChatSession::new(&config);
        let exit = run_chat(
            &mut chat,
            &input_rx,
            Duration::ZERO,
            &render_tx,
            ScriptedSource::echo,
        )
        .unwrap();
        (exit, chat)
    });

    type_text(&input_tx, "hi\n");
    assert!(wait_for(&log, "You said: hi"));
    input_tx.send(InputEvent::Cancel).unwrap();

    let (exit, chat) = worker.join().unwrap();
    renderer.join();

    assert_eq!(exit, LoopExit::Left);
    assert_eq!(chat.transcript(), "> hi\nA: You said: hi\n");
    assert!(!chat.is_streaming());
}

#[test]
fn test_chat_stream_failure_is_shown() {
    let config = immediate_config();
    let (input_tx, input_rx) = unbounded();
    let (render_tx, render_rx) = unbounded();
    let (display, log) = MemoryDisplay::new(18, 5);
    let renderer = RendererActor::spawn(render_rx, display).unwrap();

    let worker = thread::spawn(move || {
        let mut chat = ChatSession::new(&config);
        let failing = |_: &str| ScriptedSource::new(["par", "tial"]).failing_with("offline");
        run_chat(&mut chat, &input_rx, Duration::ZERO, &render_tx, failing).unwrap();
        chat
    });

    type_text(&input_tx, "ping\n");
    assert!(wait_for(&log, "[Error] offline"));
    input_tx.send(InputEvent::Cancel).unwrap();

    let chat = worker.join().unwrap();
    renderer.join();
    assert_eq!(chat.transcript(), "> ping\nA: partial\n[Error] offline\n");
}
