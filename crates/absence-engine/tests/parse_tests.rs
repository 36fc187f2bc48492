//! Tests for unfolding, chunking, and field extraction.

use absence_engine::extractor::{AnomalyKind, Property};
use absence_engine::{
    chunk_events, extract_event, parse_calendar, unfold, CalendarEvent, Participant,
};

const LEAVE_EVENT: &str = "BEGIN:VCALENDAR
BEGIN:VEVENT
DTSTART;TZID=Europe/Bucharest:20240110T090000
DTEND;TZID=Europe/Bucharest:20240110T170000
SUMMARY:Alice: annual leave
CATEGORIES:leaves
DESCRIPTION:Back on Thursday
ATTENDEE;CUTYPE=INDIVIDUAL;CN=Alice Pop;PARTSTAT=ACCEPTED:mailto:alice@example.com
ATTENDEE;CUTYPE=INDIVIDUAL;CN=Bogdan Ionescu;PARTSTAT=ACCEPTED:mailto:bogdan@example.com
END:VEVENT
END:VCALENDAR
";

// ---------------------------------------------------------------------------
// Unfolding
// ---------------------------------------------------------------------------

#[test]
fn unfold_removes_fold_inside_a_line() {
    let folded = "ATTENDEE;CN=Ali\n ce;X:mailto:al\n ice@example.com\n";
    assert_eq!(
        unfold(folded),
        "ATTENDEE;CN=Alice;X:mailto:alice@example.com\n"
    );
}

#[test]
fn unfold_leaves_tab_continuations_alone() {
    let text = "SUMMARY:Long\n\ttitle\n";
    assert_eq!(unfold(text), text);
}

#[test]
fn unfold_is_idempotent() {
    let once = unfold("A\n B\n  C").into_owned();
    assert_eq!(unfold(&once), once);
}

// ---------------------------------------------------------------------------
// Chunking
// ---------------------------------------------------------------------------

#[test]
fn chunker_returns_bodies_in_order_without_markers() {
    let text = "BEGIN:VEVENT\nSUMMARY:one\nEND:VEVENT\nBEGIN:VEVENT\nSUMMARY:two\nEND:VEVENT\n";
    let bodies = chunk_events(text);
    assert_eq!(bodies, vec!["\nSUMMARY:one\n", "\nSUMMARY:two\n"]);
}

#[test]
fn chunker_without_events_is_empty() {
    assert!(chunk_events("BEGIN:VCALENDAR\nEND:VCALENDAR\n").is_empty());
    assert!(chunk_events("").is_empty());
}

#[test]
fn chunker_does_not_swallow_past_next_end_marker() {
    // First event never ends; the non-greedy match stops at the first END.
    let text = "BEGIN:VEVENT\nSUMMARY:broken\nBEGIN:VEVENT\nSUMMARY:ok\nEND:VEVENT\nBEGIN:VEVENT\nSUMMARY:third\nEND:VEVENT\n";
    let bodies = chunk_events(text);
    assert_eq!(bodies.len(), 2);
    assert!(bodies[1].contains("third"));
    assert!(!bodies[1].contains("ok"));
}

// ---------------------------------------------------------------------------
// Extraction
// ---------------------------------------------------------------------------

#[test]
fn extracts_all_fields() {
    let parsed = parse_calendar(LEAVE_EVENT);
    assert_eq!(parsed.events.len(), 1);
    assert!(parsed.anomalies.is_empty());

    let event = &parsed.events[0];
    assert_eq!(event.start.as_deref(), Some("20240110T090000"));
    assert_eq!(event.end.as_deref(), Some("20240110T170000"));
    assert_eq!(event.title.as_deref(), Some("Alice: annual leave"));
    assert_eq!(event.category.as_deref(), Some("leaves"));
    assert_eq!(event.description.as_deref(), Some("Back on Thursday"));
    assert_eq!(
        event.attendees,
        vec![
            Participant::new("Alice Pop", "alice@example.com"),
            Participant::new("Bogdan Ionescu", "bogdan@example.com"),
        ]
    );
    assert_eq!(event.organizer, None);
}

#[test]
fn value_keeps_colons_after_the_first() {
    let event = extract_event("SUMMARY:Exam: Math: part 2\n").event;
    assert_eq!(event.title.as_deref(), Some("Exam: Math: part 2"));
}

#[test]
fn all_day_dates_are_kept_verbatim() {
    let event = extract_event("DTSTART;VALUE=DATE:20240110\nDTEND;VALUE=DATE:20240111\n").event;
    assert_eq!(event.start.as_deref(), Some("20240110"));
    assert_eq!(event.end.as_deref(), Some("20240111"));
}

#[test]
fn unknown_lines_are_ignored() {
    let extraction =
        extract_event("UID:123@example.com\nDTSTAMP:20240101T000000Z\nSTATUS:CONFIRMED\n");
    assert_eq!(extraction.event, CalendarEvent::default());
    assert!(extraction.anomalies.is_empty());
}

#[test]
fn attendee_parameters_may_be_reordered() {
    let event = extract_event(
        "ATTENDEE;PARTSTAT=ACCEPTED;ROLE=REQ-PARTICIPANT;CUTYPE=INDIVIDUAL;CN=Dana:mailto:dana@example.com\n",
    )
    .event;
    assert_eq!(
        event.attendees,
        vec![Participant::new("Dana", "dana@example.com")]
    );
}

#[test]
fn quoted_common_name_is_unquoted() {
    let event =
        extract_event("ATTENDEE;CN=\"Pop, Alice\";RSVP=TRUE:MAILTO:alice@example.com\n").event;
    assert_eq!(
        event.attendees,
        vec![Participant::new("Pop, Alice", "alice@example.com")]
    );
}

#[test]
fn unquoted_common_name_keeps_its_colons() {
    let extraction = extract_event(
        "ATTENDEE;CUTYPE=INDIVIDUAL;CN=Team: Ops;PARTSTAT=ACCEPTED:mailto:ops@example.com\n",
    );
    assert_eq!(
        extraction.event.attendees,
        vec![Participant::new("Team: Ops", "ops@example.com")]
    );
    assert!(extraction.anomalies.is_empty());
}

#[test]
fn address_glued_to_a_colon_name_is_dropped() {
    let event = extract_event("ORGANIZER;CN=Ops: Night:MAILTO:night@example.com\n").event;
    assert_eq!(
        event.organizer,
        Some(Participant::new("Ops: Night", "night@example.com"))
    );
}

#[test]
fn later_organizer_line_wins() {
    let event = extract_event(
        "ORGANIZER;CN=First:mailto:first@example.com\nORGANIZER;CN=Second:mailto:second@example.com\n",
    )
    .event;
    assert_eq!(
        event.organizer,
        Some(Participant::new("Second", "second@example.com"))
    );
    assert!(event.attendees.is_empty());
}

#[test]
fn attendee_without_mailto_is_skipped_and_reported() {
    let extraction = extract_event(
        "SUMMARY:Leave\nATTENDEE;CN=Nomail;PARTSTAT=ACCEPTED\nATTENDEE;CN=Ok:mailto:ok@example.com\n",
    );
    assert_eq!(
        extraction.event.attendees,
        vec![Participant::new("Ok", "ok@example.com")]
    );
    assert_eq!(extraction.anomalies.len(), 1);
    assert_eq!(extraction.anomalies[0].property, Property::Attendee);
    assert_eq!(
        extraction.anomalies[0].kind,
        AnomalyKind::MissingParameter("mailto:")
    );
}

#[test]
fn organizer_without_common_name_is_reported() {
    let extraction = extract_event("ORGANIZER:mailto:boss@example.com\n");
    assert_eq!(extraction.event.organizer, None);
    assert_eq!(
        extraction.anomalies[0].kind,
        AnomalyKind::MissingParameter("CN=")
    );
}

#[test]
fn property_without_colon_is_reported() {
    let extraction = extract_event("SUMMARY\nCATEGORIES:leaves\n");
    assert_eq!(extraction.event.title, None);
    assert_eq!(extraction.event.category.as_deref(), Some("leaves"));
    assert_eq!(extraction.anomalies[0].kind, AnomalyKind::MissingValue);
    assert_eq!(extraction.anomalies[0].line, "SUMMARY");
}

#[test]
fn anomalies_carry_event_index() {
    let text = "BEGIN:VEVENT\nSUMMARY:fine\nEND:VEVENT\nBEGIN:VEVENT\nATTENDEE;CN=x\nEND:VEVENT\n";
    let parsed = parse_calendar(text);
    assert_eq!(parsed.events.len(), 2);
    assert_eq!(parsed.anomalies.len(), 1);
    assert_eq!(parsed.anomalies[0].event_index, 1);
}

#[test]
fn folded_attendee_parses_like_unfolded() {
    let unfolded = "BEGIN:VEVENT\nDTSTART:20240110T090000\nATTENDEE;CUTYPE=INDIVIDUAL;CN=Alice Pop;PARTSTAT=ACCEPTED:mailto:alice@example.com\nEND:VEVENT\n";
    let folded = "BEGIN:VEVENT\nDTSTART:20240110T090000\nATTENDEE;CUTYPE=INDIVI\n DUAL;CN=Alice P\n op;PARTSTAT=ACCEPTED:mailto:alice@exam\n ple.com\nEND:VEVENT\n";
    assert_eq!(parse_calendar(folded), parse_calendar(unfolded));
}

#[test]
fn crlf_document_parses_after_normalizing() {
    let crlf = LEAVE_EVENT.replace('\n', "\r\n");
    let normalized = absence_engine::source::normalize_newlines(&crlf);
    assert_eq!(parse_calendar(&normalized), parse_calendar(LEAVE_EVENT));
}

#[test]
fn read_calendar_reports_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope.ics");
    let err = absence_engine::read_calendar(&missing).unwrap_err();
    assert!(matches!(err, absence_engine::AbsenceError::Io { .. }));
    assert!(err.to_string().contains("nope.ics"));
}
