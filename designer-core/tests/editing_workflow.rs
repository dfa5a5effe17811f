//! Editing Workflow Integration Tests
//!
//! Drives the pipeline the way the designer's surfaces do:
//! - Property form edits with grid snapping and undo/redo
//! - Deleting selected and unselected fields
//! - Palette search and placement
//! - Notification delivery to async subscribers

use designer_core::{
    DesignerConfig, DesignerError, DesignerEvent, Field, FieldId, FieldTypeCombination,
    FieldTypeGroup, GridSettings, Locations, NewField, PositionAxis, SelectionController,
    SizeAxis, UpdatePipeline, WorkingCopy,
};
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Create a pipeline over a document with `total_pages` pages.
fn designer(total_pages: u32, snap_to_grid: bool) -> UpdatePipeline {
    init_tracing();
    UpdatePipeline::with_config(DesignerConfig {
        total_pages,
        grid: GridSettings {
            size: 10.0,
            snap_to_grid,
            show_grid: snap_to_grid,
        },
        ..DesignerConfig::default()
    })
}

/// Create a text field draft at the given geometry.
fn text_field(name: &str, locations: Locations) -> NewField {
    NewField {
        name: name.to_string(),
        locations,
        recipient_index: 0,
        required: false,
        read_only: false,
        input_type: "TEXT_FIELD".to_string(),
        content_type: "DATA".to_string(),
    }
}

// ============================================================================
// Geometry edits with undo/redo
// ============================================================================

#[test]
fn test_snapped_position_edit_then_undo_redo() {
    let mut pipeline = designer(1, true);
    let f1 = pipeline
        .create_field(text_field("F1", Locations::new(1, 10.0, 10.0, 50.0, 20.0)))
        .expect("create F1");

    let snapped = pipeline
        .propose_position_change(f1.id, PositionAxis::Left, 13.0)
        .expect("move");
    assert!((snapped.locations.left - 10.0).abs() < f64::EPSILON);
    assert!(pipeline.can_undo());

    let undone = pipeline.undo().expect("undo");
    assert!((undone[0].locations.left - 10.0).abs() < f64::EPSILON);

    pipeline
        .propose_position_change(f1.id, PositionAxis::Left, 20.0)
        .expect("move to 20");
    assert!(!pipeline.can_redo());

    let undone = pipeline.undo().expect("undo 20");
    assert!((undone[0].locations.left - 10.0).abs() < f64::EPSILON);

    let redone = pipeline.redo().expect("redo 20");
    assert!((redone[0].locations.left - 20.0).abs() < f64::EPSILON);
}

#[test]
fn test_undo_restores_exact_snapshot() {
    let mut pipeline = designer(2, false);
    pipeline
        .create_field(text_field("A", Locations::new(1, 0.0, 0.0, 10.0, 10.0)))
        .expect("A");
    let b = pipeline
        .create_field(text_field("B", Locations::new(2, 5.0, 5.0, 10.0, 10.0)))
        .expect("B");
    pipeline
        .create_field(text_field("C", Locations::new(1, 9.0, 9.0, 10.0, 10.0)))
        .expect("C");

    let before = pipeline.fields().to_vec();
    pipeline
        .propose_size_change(b.id, SizeAxis::Height, 44.0)
        .expect("resize");
    assert_ne!(pipeline.fields(), before.as_slice());

    pipeline.undo().expect("undo");
    assert_eq!(pipeline.fields(), before.as_slice());

    let before = pipeline.fields().to_vec();
    pipeline.delete_field(b.id).expect("delete");
    pipeline.undo().expect("undo delete");
    assert_eq!(pipeline.fields(), before.as_slice());
}

#[test]
fn test_undo_redo_on_empty_history_is_noop() {
    let mut pipeline = designer(1, false);
    assert!(!pipeline.can_undo());
    assert!(!pipeline.can_redo());
    assert!(pipeline.undo().is_none());
    assert!(pipeline.redo().is_none());
}

#[test]
fn test_locations_are_replaced_not_merged() {
    let mut pipeline = designer(1, false);
    let field = pipeline
        .create_field(text_field("F", Locations::new(1, 10.0, 10.0, 50.0, 20.0)))
        .expect("create");

    // Two surfaces stage edits from the same starting snapshot.
    let mut form = WorkingCopy::of(&field);
    let mut inspector = WorkingCopy::of(&field);
    form.set_position(PositionAxis::Left, 100.0);
    inspector.set_position(PositionAxis::Top, 200.0);

    form.commit(&mut pipeline).expect("form commit");
    let last = inspector
        .commit(&mut pipeline)
        .expect("inspector commit")
        .expect("committed");

    // The later commit carries its whole geometry, stale left included.
    assert_eq!(last.locations, Locations::new(1, 10.0, 200.0, 50.0, 20.0));
}

#[test]
fn test_negative_size_commit_leaves_store_unchanged() {
    let mut pipeline = designer(1, false);
    let field = pipeline
        .create_field(text_field("F", Locations::new(1, 10.0, 10.0, 50.0, 20.0)))
        .expect("create");
    let before = pipeline.fields().to_vec();
    let mut rx = pipeline.subscribe();

    let mut form = WorkingCopy::of(&field);
    form.set_size(SizeAxis::Height, -3.0);
    let result = form.commit(&mut pipeline);

    assert!(matches!(result, Err(DesignerError::InvalidGeometry(_))));
    assert_eq!(pipeline.fields(), before.as_slice());
    assert!(rx.try_recv().is_err());

    // Undo still reverts the creation, not a phantom frame.
    assert_eq!(pipeline.undo(), Some(Vec::new()));
}

// ============================================================================
// Selection
// ============================================================================

#[test]
fn test_delete_selected_clears_selection() {
    let mut pipeline = designer(1, false);
    let f2 = pipeline
        .create_field(text_field("F2", Locations::new(1, 0.0, 0.0, 10.0, 10.0)))
        .expect("F2");
    let f3 = pipeline
        .create_field(text_field("F3", Locations::new(1, 20.0, 0.0, 10.0, 10.0)))
        .expect("F3");

    pipeline.select(Some(f2.id)).expect("select F2");
    pipeline.delete_field(f2.id).expect("delete F2");
    assert_eq!(pipeline.selection().selected_field_id(), None);

    let f4 = pipeline
        .create_field(text_field("F4", Locations::new(1, 40.0, 0.0, 10.0, 10.0)))
        .expect("F4");
    pipeline.select(Some(f4.id)).expect("select F4");
    pipeline.delete_field(f3.id).expect("delete F3");
    assert_eq!(pipeline.selection().selected_field_id(), Some(f4.id));
}

#[test]
fn test_delete_unknown_field_fails() {
    let mut pipeline = designer(1, false);
    assert!(matches!(
        pipeline.delete_field(FieldId::new()),
        Err(DesignerError::NotFound(_))
    ));
    assert!(!pipeline.can_undo());
}

#[test]
fn test_selecting_field_on_other_page_keeps_page() {
    let mut pipeline = designer(3, false);
    let far = pipeline
        .create_field(text_field("far", Locations::new(3, 0.0, 0.0, 10.0, 10.0)))
        .expect("far");

    pipeline.select(Some(far.id)).expect("select");
    assert_eq!(pipeline.selection().current_page(), 1);
    assert!(pipeline.page_fields().is_empty());
    assert_eq!(pipeline.selected_field(), Some(&far));
    assert!(pipeline.selection().is_selected(&far));
}

#[test]
fn test_page_fields_follow_active_page() {
    let mut pipeline = designer(2, false);
    let names = [("a", 1), ("b", 2), ("c", 1), ("d", 2)];
    for (name, page) in names {
        pipeline
            .create_field(text_field(name, Locations::new(page, 0.0, 0.0, 1.0, 1.0)))
            .expect("create");
    }

    let page_names = |fields: Vec<Field>| fields.into_iter().map(|f| f.name).collect::<Vec<_>>();
    assert_eq!(page_names(pipeline.page_fields()), vec!["a", "c"]);
    pipeline.set_page(2).expect("page 2");
    assert_eq!(page_names(pipeline.page_fields()), vec!["b", "d"]);
    assert_eq!(
        SelectionController::derive_page_fields(pipeline.fields(), 2),
        pipeline.page_fields()
    );
}

// ============================================================================
// Palette
// ============================================================================

#[test]
fn test_palette_search() {
    let groups = vec![FieldTypeGroup::new(
        "Text",
        vec![FieldTypeCombination::new("Full Name", "TEXT_FIELD", "SIGNER_NAME")],
    )];
    let filtered = designer_core::catalog::filter(&groups, "name");
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0].label, "Text");
    assert_eq!(filtered[0].items.len(), 1);

    assert!(designer_core::catalog::filter(&groups, "zzz").is_empty());
}

#[test]
fn test_palette_pick_and_place() {
    let mut pipeline = designer(2, true);
    let combo = pipeline
        .palette("sign")
        .iter()
        .flat_map(|g| g.items.iter())
        .find(|item| item.label == "Signature")
        .cloned()
        .expect("signature entry");

    pipeline.select_field_type(Some(&combo));
    assert!(pipeline.selection().is_type_selected(&combo));

    let placed = pipeline.place_field(104.0, 296.0).expect("place");
    assert_eq!(placed.name, "Signature");
    assert_eq!(placed.locations, Locations::new(1, 100.0, 300.0, 200.0, 50.0));
}

// ============================================================================
// Notifications
// ============================================================================

#[test]
fn test_each_collection_event_carries_full_snapshot() {
    let mut pipeline = designer(1, false);
    let mut rx = pipeline.subscribe();

    let a = pipeline
        .create_field(text_field("A", Locations::new(1, 0.0, 0.0, 1.0, 1.0)))
        .expect("A");
    pipeline
        .propose_position_change(a.id, PositionAxis::Top, 5.0)
        .expect("move");
    pipeline.delete_field(a.id).expect("delete");
    pipeline.undo().expect("undo");

    let mut sizes = Vec::new();
    while let Ok(event) = rx.try_recv() {
        if let Some(fields) = event.fields() {
            sizes.push(fields.len());
        }
    }
    assert_eq!(sizes, vec![1, 1, 0, 1]);
}

#[tokio::test]
async fn test_async_subscriber_receives_updates() {
    let mut pipeline = designer(1, false);
    let mut rx = pipeline.subscribe();

    let field = pipeline
        .create_field(text_field("A", Locations::new(1, 0.0, 0.0, 1.0, 1.0)))
        .expect("create");

    let event = rx.recv().await.expect("event");
    match event {
        DesignerEvent::FieldCreated { field: created, fields } => {
            assert_eq!(created, field);
            assert_eq!(fields, vec![field]);
        }
        other => panic!("unexpected event {other:?}"),
    }

    let event = rx.recv().await.expect("history event");
    assert_eq!(
        event,
        DesignerEvent::HistoryChanged {
            can_undo: true,
            can_redo: false
        }
    );
}
