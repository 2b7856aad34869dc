use hrplan_core::{
    decode, ActiveTab, Axis, DocumentView, EditIntent, EditOutcome, LoadTag, MemoryDocumentView,
    PlanSession, RenderedView, Settings, ViewState, TEMPLATE,
};

fn session() -> PlanSession<MemoryDocumentView> {
    PlanSession::open(MemoryDocumentView::new(TEMPLATE), Settings::default())
}

#[test]
fn effective_edit_encodes_and_requests_persist() {
    let mut session = session();
    let outcome = session.apply(EditIntent::SetCell {
        member: "田中".to_string(),
        theme: "AEOシステム EKS verup対応".to_string(),
        month: "2026/6".to_string(),
        value: "0.5".to_string(),
    });

    assert_eq!(outcome, EditOutcome::Persisted);
    assert_eq!(session.view().persist_requests(), 1);
    let stored = decode(&session.view().raw_text());
    assert_eq!(&stored, session.document());
    assert_eq!(stored.totals["2026/6"], 0.5);
}

#[test]
fn noop_edits_leave_the_view_untouched() {
    let mut session = session();
    let before = session.view().raw_text();

    let intents = vec![
        EditIntent::RenameTheme {
            old_name: "BCQシステム 新規構築".to_string(),
            new_name: "BCQシステム 新規構築".to_string(),
        },
        EditIntent::RenameMember {
            old_name: "田中".to_string(),
            new_name: "  ".to_string(),
        },
        EditIntent::DeleteTheme { index: 99 },
        EditIntent::SetMemberRate {
            index: 7,
            rate: "100".to_string(),
        },
        EditIntent::SetCell {
            member: "田中".to_string(),
            theme: "BCQシステム 新規構築".to_string(),
            month: "1999/1".to_string(),
            value: "1".to_string(),
        },
        EditIntent::ReplaceSource {
            text: TEMPLATE.to_string(),
        },
    ];
    for intent in intents {
        assert_eq!(session.apply(intent), EditOutcome::Unchanged);
    }
    assert_eq!(session.view().persist_requests(), 0);
    assert_eq!(session.view().raw_text(), before);
}

#[test]
fn every_effective_edit_persists_once() {
    let mut session = session();
    session.apply(EditIntent::AddTheme);
    session.apply(EditIntent::AddMember);
    session.apply(EditIntent::RenameTheme {
        old_name: "BCQシステム 新規構築".to_string(),
        new_name: "BCQ 2".to_string(),
    });
    session.apply(EditIntent::DeleteMember { index: 0 });

    assert_eq!(session.view().persist_requests(), 4);
    let stored = decode(&session.view().raw_text());
    assert_eq!(stored.themes.last().unwrap().name, "新規テーマ");
    assert!(stored.rows.iter().any(|row| row.theme == "BCQ 2"));
    assert!(stored.rows.iter().any(|row| row.member == "田中"));
    assert_eq!(stored.members.len(), 2);
}

#[test]
fn placeholder_names_come_from_settings() {
    let settings = Settings::from_yaml_str("new_theme_name: Theme\nnew_member_name: Person\n")
        .unwrap();
    let mut session = PlanSession::open(MemoryDocumentView::new(TEMPLATE), settings);
    session.apply(EditIntent::AddTheme);
    session.apply(EditIntent::AddTheme);
    session.apply(EditIntent::AddMember);

    let names = session.document().names(Axis::Theme);
    assert_eq!(&names[names.len() - 2..], ["Theme", "Theme 1"]);
    assert_eq!(session.document().members.last().unwrap().name, "Person");
}

#[test]
fn source_replacement_is_stored_verbatim() {
    let mut session = session();
    let text = "---\nmonths: [\"x\"]\n---\nMember,Theme,x\nA,B,0.5\n";

    let outcome = session.apply(EditIntent::ReplaceSource {
        text: text.to_string(),
    });

    assert_eq!(outcome, EditOutcome::Persisted);
    assert_eq!(session.view().raw_text(), text);
    assert_eq!(session.document().months, vec!["x"]);
    assert_eq!(session.document().rows[0].value("x"), 0.5);
}

#[test]
fn reload_picks_up_external_changes() {
    let mut session = session();
    session
        .view_mut()
        .set_raw_text("Member,Theme,2026/4\nA,B,1\n".to_string());
    assert_eq!(session.document().rows.len(), 2);

    session.reload();
    assert_eq!(session.document().rows.len(), 1);
    assert!(session.document().themes.is_empty());
    assert_eq!(session.view().persist_requests(), 0);
}

#[test]
fn render_follows_the_active_tab() {
    let session = session();

    match session.render(&ViewState::default()) {
        RenderedView::Pivot(result) => {
            assert_eq!(result.primary, Axis::Member);
            assert_eq!(result.group("田中").unwrap().subtotal[0].load, LoadTag::Underutilized);
        }
        other => panic!("unexpected view {other:?}"),
    }
    match session.render(&ViewState::new(ActiveTab::ThemeToMember)) {
        RenderedView::Pivot(result) => assert_eq!(result.primary, Axis::Theme),
        other => panic!("unexpected view {other:?}"),
    }
    match session.render(&ViewState::new(ActiveTab::Master)) {
        RenderedView::Master(master) => {
            assert_eq!(master.themes.len(), 2);
            assert_eq!(master.members[0].rate, 3000.0);
        }
        other => panic!("unexpected view {other:?}"),
    }
    match session.render(&ViewState::new(ActiveTab::Source)) {
        RenderedView::Source { text } => assert_eq!(text, TEMPLATE),
        other => panic!("unexpected view {other:?}"),
    }
}

#[test]
fn session_pivot_uses_settings_thresholds() {
    let settings = Settings::from_yaml_str("underutilized_threshold: 0.1\n").unwrap();
    let session = PlanSession::open(MemoryDocumentView::new(TEMPLATE), settings);
    let result = session.pivot(Axis::Member);
    assert_eq!(result.group("田中").unwrap().subtotal[0].load, LoadTag::Normal);
}

#[test]
fn intents_and_views_cross_the_host_boundary_as_json() {
    let intent: EditIntent = serde_json::from_str(
        r#"{"kind":"set_cell","member":"山田","theme":"BCQシステム 新規構築","month":"2026/5","value":"0.25"}"#,
    )
    .unwrap();
    let mut session = session();
    assert_eq!(session.apply(intent), EditOutcome::Persisted);

    let rendered = serde_json::to_value(session.render(&ViewState::default())).unwrap();
    assert_eq!(rendered["tab"], "pivot");
    assert_eq!(rendered["primary"], "member");
    assert_eq!(rendered["groups"][0]["subtotal"][0]["load"], "underutilized");
    assert_eq!(rendered["grand_total"][1], 0.55);

    let source = serde_json::to_value(session.render(&ViewState::new(ActiveTab::Source))).unwrap();
    assert_eq!(source["tab"], "source");
    assert_eq!(source["text"], session.view().raw_text());
}
