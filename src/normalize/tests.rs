//! Tests for normalisation

use super::*;
use pretty_assertions::assert_eq;
use serde_json::json;

fn raw_pin() -> serde_json::Value {
    json!({
        "id": "604538018670785766",
        "images": {
            "236x": {"url": "https://i.pinimg.com/236x/ab.jpg", "width": 236, "height": 354},
            "orig": {"url": "https://i.pinimg.com/originals/ab.jpg", "width": 1200, "height": 1800}
        },
        "created_at": "Tue, 05 Mar 2024 10:15:30 +0000",
        "dominant_color": "#a3b1c2",
        "aggregate_metadata": {"aggregated_stats": {"saves": 321}},
        "repin_count": 4,
        "title": "Oil study",
        "auto_alt_text": "a painting of a field"
    })
}

#[test]
fn test_pin_summary_from_raw() {
    let pin = PinSummary::from_raw(&raw_pin());

    assert_eq!(
        pin,
        PinSummary {
            id: "604538018670785766".to_string(),
            url: "https://i.pinimg.com/originals/ab.jpg".to_string(),
            width: 1200,
            height: 1800,
            created_at: 1_709_633_730,
            dominant_color: "#a3b1c2".to_string(),
            count: PinCounts {
                save: 321,
                repin: 4
            },
            text: PinText {
                title: "Oil study".to_string(),
                auto_alt_text: "a painting of a field".to_string(),
            },
        }
    );
}

#[test]
fn test_pin_summary_defaults() {
    let pin = PinSummary::from_raw(&json!({"id": 17, "title": null}));
    assert_eq!(pin.id, "17");
    assert_eq!(pin.url, "");
    assert_eq!(pin.width, 0);
    assert_eq!(pin.created_at, 0);
    assert_eq!(pin.count, PinCounts::default());
    assert_eq!(pin.text.title, "");
}

#[test]
fn test_parse_created_at() {
    assert_eq!(
        parse_created_at("Tue, 05 Mar 2024 10:15:30 +0000"),
        Some(1_709_633_730)
    );
    assert_eq!(
        parse_created_at("Tue, 05 Mar 2024 12:15:30 +0200"),
        Some(1_709_633_730)
    );
    assert_eq!(parse_created_at("yesterday"), None);
    assert_eq!(parse_created_at(""), None);
}

#[test]
fn test_board_summary_from_raw() {
    let board = BoardSummary::from_raw(&json!({
        "id": "99",
        "name": "Paintings",
        "url": "/someone/paintings/",
        "follower_count": 12,
        "pin_count": 340,
        "privacy": "public"
    }));

    assert_eq!(board.id, "99");
    assert_eq!(board.name, "Paintings");
    assert_eq!(board.url, "/someone/paintings/");
    assert_eq!(board.follower_count, 12);
    assert_eq!(board.pin_count, 340);
}

#[test]
fn test_pin_urls_skip_missing() {
    let pins = vec![raw_pin(), json!({"id": "2"})];
    assert_eq!(pin_urls(&pins), vec!["https://i.pinimg.com/originals/ab.jpg"]);
}

#[test]
fn test_board_ids_first_seen_order() {
    let boards = vec![
        json!({"id": "b"}),
        json!({"id": "a"}),
        json!({"id": "b"}),
        json!({"name": "no id"}),
    ];
    assert_eq!(board_ids(&boards), vec!["b", "a"]);
}

#[test]
fn test_pin_detail_summary_from_raw() {
    let raw = json!({
        "entityId": "4503",
        "imageSpec_orig": {"url": "https://i.pinimg.com/originals/a.jpg", "width": 736, "height": 1104},
        "link": "https://example.com/fern",
        "createdAt": "Tue, 05 Mar 2024 10:15:30 +0000",
        "pinJoin": {"visualAnnotation": ["fern", "leaf"]},
        "dominantColor": "#3a5f2b",
        "totalReactionCount": 9,
        "aggregatedPinData": {"aggregatedStats": {"saves": 120}},
        "shareCount": 3,
        "favoriteUserCount": 2,
        "repinCount": 11,
        "altText": "fern",
        "autoAltText": "a green fern",
        "description": "A fern.",
        "closeupDescription": "Close fern.",
        "title": "Fern",
        "gridTitle": "Fern grid",
        "category": "plants"
    });

    let pin = PinDetailSummary::from_raw(&raw);
    assert_eq!(
        pin,
        PinDetailSummary {
            id: "4503".to_string(),
            url: "https://i.pinimg.com/originals/a.jpg".to_string(),
            width: 736,
            height: 1104,
            link: "https://example.com/fern".to_string(),
            created_at: 1_709_633_730,
            join: vec!["fern".to_string(), "leaf".to_string()],
            dominant_color: "#3a5f2b".to_string(),
            count: PinDetailCounts {
                reaction: 9,
                save: 120,
                share: 3,
                favorite: 2,
                repin: 11,
            },
            text: PinDetailText {
                alttext: "fern".to_string(),
                autoalttext: "a green fern".to_string(),
                description: "A fern.".to_string(),
                closeup_description: "Close fern.".to_string(),
                title: "Fern".to_string(),
                grid_title: "Fern grid".to_string(),
            },
            category: vec!["plants".to_string()],
        }
    );
}

#[test]
fn test_pin_detail_summary_defaults() {
    let pin = PinDetailSummary::from_raw(&json!({"entityId": 4503, "pinJoin": null}));
    assert_eq!(pin.id, "4503");
    assert_eq!(pin.created_at, 0);
    assert!(pin.join.is_empty());
    assert!(pin.category.is_empty());
    assert_eq!(pin.count, PinDetailCounts::default());
}
