//! Error reporting through the public engine API.

use trellis_core::geometry::Size;
use trellis_place::{ParseErrorKind, Place, PlaceError};
use trellis_test_utils::MockHost;

fn parse_kind(result: Result<(), PlaceError>) -> Option<ParseErrorKind> {
    match result {
        Err(PlaceError::Parse(err)) => Some(err.kind),
        _ => None,
    }
}

fn bound(description: &str) -> (Place, MockHost) {
    let host = MockHost::new(Size::new(200, 100));
    let mut place = Place::new();
    place.bind(host.clone()).expect("bind");
    place.div(description).expect("div");
    (place, host)
}

#[test]
fn test_div_errors() {
    let mut place = Place::new();
    assert_eq!(parse_kind(place.div("<a <b>")), Some(ParseErrorKind::UnexpectedEnd));
    assert_eq!(
        parse_kind(place.div("<a $>")),
        Some(ParseErrorKind::InvalidCharacter('$'))
    );
    assert_eq!(
        parse_kind(place.div("<vert <a width=20>>")),
        Some(ParseErrorKind::AxisContradiction)
    );
    assert_eq!(
        parse_kind(place.div("<x grid dock>")),
        Some(ParseErrorKind::InvalidKindCombination)
    );
}

#[test]
fn test_duplicate_name_reports_field_and_offset() {
    let mut place = Place::new();
    match place.div("<a><b><a>") {
        Err(PlaceError::Parse(err)) => {
            assert_eq!(err.kind, ParseErrorKind::DuplicateName);
            assert_eq!(err.field.as_deref(), Some("a"));
            assert_eq!(err.offset, 7);
            assert_eq!(err.to_string(), "duplicate division name in field 'a' at offset 7");
        }
        other => panic!("unexpected result {:?}", other),
    }
}

#[test]
fn test_failed_div_keeps_layout() {
    let (mut place, _host) = bound("<a>|<b>");
    assert!(place.div("<a><a>").is_err());
    assert_eq!(place.description(), "<a>|<b>");
    assert!(place.area("a").is_some());
}

#[test]
fn test_modify_unknown_target() {
    let (mut place, _host) = bound("<a><b>");
    match place.modify("zz", "<c>") {
        Err(PlaceError::Parse(err)) => {
            assert_eq!(err.kind, ParseErrorKind::UnknownTarget);
            assert_eq!(err.field.as_deref(), Some("zz"));
        }
        other => panic!("unexpected result {:?}", other),
    }
}

#[test]
fn test_modify_name_clashes() {
    let (mut place, host) = bound("<a><b <x>><c>");
    let element = host.spawn_child();
    place.field("a").add(element).expect("add");

    assert_eq!(
        parse_kind(place.modify("b", "<a>")),
        Some(ParseErrorKind::RedefinedField)
    );
    assert_eq!(
        parse_kind(place.modify("b", "<c>")),
        Some(ParseErrorKind::DuplicateName)
    );
    assert_eq!(
        parse_kind(place.modify("b", "<m <b>>")),
        Some(ParseErrorKind::DuplicateName)
    );
    assert_eq!(place.description(), "<a><b <x>><c>");

    // Names from the replaced sub-tree may be reused.
    place.modify("b", "<x><y>").expect("modify");
    assert_eq!(place.description(), "<a><b <x><y>><c>");
}

#[test]
fn test_modify_axis_contradiction() {
    let (mut place, _host) = bound("<vert <a><b>>");
    assert_eq!(
        parse_kind(place.modify("a", "width=20 <p>")),
        Some(ParseErrorKind::AxisContradiction)
    );
    place.modify("a", "height=20 <p>").expect("modify");
    assert_eq!(place.area("a").map(|r| r.height), Some(20));
}

#[test]
fn test_binding_errors() {
    let host = MockHost::new(Size::new(10, 10));
    let mut place = Place::new();
    let element = host.spawn_child();

    assert!(matches!(place.field("a").add(element), Err(PlaceError::NotBound)));
    assert!(matches!(place.field("a").text("t"), Err(PlaceError::NotBound)));
    assert_eq!(place.collocate(), Err(PlaceError::NotBound));
    assert_eq!(place.window_resized(), Err(PlaceError::NotBound));

    place.bind(host.clone()).expect("bind");
    assert_eq!(place.bind(host.clone()), Err(PlaceError::AlreadyBound));
}

#[test]
fn test_foreign_element_is_rejected() {
    let (mut place, host) = bound("<a>");
    let foreign = host.spawn_foreign();
    assert!(matches!(
        place.field("a").add(foreign),
        Err(PlaceError::NotAChild(e)) if e == foreign
    ));
    assert!(matches!(
        place.field("a").fasten(foreign),
        Err(PlaceError::NotAChild(_))
    ));
    assert!(place.field_elements("a").is_empty());
}

#[test]
fn test_label_failure_is_reported() {
    let (mut place, host) = bound("<a>");
    host.fail_labels(true);
    assert!(matches!(place.field("a").text("hi"), Err(PlaceError::Host(_))));
    assert!(place.field_elements("a").is_empty());
}

#[test]
fn test_unknown_division() {
    let (mut place, _host) = bound("<a>");
    assert_eq!(
        place.field_visible("b", false),
        Err(PlaceError::UnknownDivision("b".to_string()))
    );
    assert_eq!(
        place.field_display("b", false),
        Err(PlaceError::UnknownDivision("b".to_string()))
    );
}
