use rowset::{
    Capabilities, Cursor, CursorHolder, DataSetItem, DataType, FilteredView, InstrumentedCursor,
    MemoryDataSet, Position, Schema, Value, ViewOptions,
};

fn numbers(n: i32) -> MemoryDataSet {
    let schema = Schema::new(vec![("id", DataType::Int32), ("label", DataType::String)]);
    let mut ds = MemoryDataSet::new(schema).with_dataset_name("numbers");
    for i in 0..n {
        ds.add(DataSetItem::from_values(vec![
            Some(Value::Int32(i)),
            Some(Value::String(format!("row{i}"))),
        ]))
        .unwrap();
    }
    ds
}

/// Backing cursor that advertises no efficient positioning
fn forward_only(n: i32) -> InstrumentedCursor<MemoryDataSet> {
    InstrumentedCursor::new(numbers(n)).with_capabilities(Capabilities::default())
}

fn backing_position(view: &FilteredView<'_, InstrumentedCursor<MemoryDataSet>>) -> Position {
    view.inner().inner().position()
}

#[test]
fn test_scenario_a_forward_replay() {
    let backing = forward_only(10);
    let stats = backing.statistics();
    let mut view = FilteredView::owned(Box::new(backing), &[7, 2, 5, 5]).unwrap();

    assert_eq!(view.selection(), &[2, 5, 5, 7]);
    assert_eq!(view.size(), Some(4));

    assert!(view.move_first());
    assert_eq!(backing_position(&view), Position::At(2));
    assert_eq!(view.get_i32(0).unwrap(), 2);

    assert!(view.move_next());
    assert_eq!(backing_position(&view), Position::At(5));

    assert!(view.move_next());
    assert_eq!(backing_position(&view), Position::At(5));
    assert_eq!(view.position(), Position::At(2));

    assert!(view.move_next());
    assert_eq!(backing_position(&view), Position::At(7));
    assert_eq!(view.get_string(1).unwrap(), "row7");

    assert!(!view.move_next());
    assert!(view.is_after_end());

    // one seek for move_first, then 3 + 0 + 2 forward steps
    assert_eq!(stats.move_to_calls(), 1);
    assert_eq!(stats.move_next_calls(), 5);
    assert_eq!(stats.backward_moves(), 0);
}

#[test]
fn test_scenario_a_direct_seek() {
    let backing = InstrumentedCursor::new(numbers(10));
    let stats = backing.statistics();
    let mut view = FilteredView::owned(Box::new(backing), &[7, 2, 5, 5]).unwrap();
    assert!(view.capabilities().efficient_move);

    let mut seen = vec![];
    while view.move_next() {
        seen.push(view.get_i32(0).unwrap());
    }
    assert_eq!(seen, vec![2, 5, 5, 7]);
    assert!(view.is_after_end());
    assert_eq!(stats.move_to_calls(), 4);
    assert_eq!(stats.move_next_calls(), 0);
}

#[test]
fn test_scenario_b_empty_selection() {
    let backing = InstrumentedCursor::new(numbers(10));
    let stats = backing.statistics();
    let mut view = FilteredView::owned(Box::new(backing), &[]).unwrap();

    assert!(view.is_empty());
    assert_eq!(view.size(), Some(0));
    assert!(!view.move_first());
    assert!(view.is_before_begin());
    assert!(!view.move_last());
    assert!(view.is_before_begin());
    assert!(!view.is_at_end());
    assert_eq!(stats.seeks(), 0);

    assert!(!view.move_next());
    assert!(view.is_after_end());
    assert!(!view.move_previous());
    assert!(view.is_before_begin());
}

#[test]
fn test_scenario_c_move_to_always_seeks() {
    let backing = forward_only(10);
    let stats = backing.statistics();
    let mut view = FilteredView::owned(Box::new(backing), &[1, 3, 4, 6, 8]).unwrap();

    assert!(view.move_to(3));
    assert_eq!(view.source_position(), Some(6));
    assert_eq!(stats.move_to_calls(), 1);
    assert_eq!(stats.move_next_calls(), 0);

    assert!(view.move_last());
    assert!(view.move_first());
    assert_eq!(stats.move_to_calls(), 3);
    assert_eq!(stats.move_next_calls(), 0);
    assert_eq!(stats.move_first_calls(), 0);
    assert_eq!(stats.move_last_calls(), 0);
}

#[test]
fn test_move_next_from_before_first_seeks() {
    let backing = forward_only(10);
    let stats = backing.statistics();
    let mut view = FilteredView::owned(Box::new(backing), &[4, 6]).unwrap();

    assert!(view.move_next());
    assert_eq!(stats.move_to_calls(), 1);
    assert_eq!(stats.move_next_calls(), 0);

    assert!(view.move_next());
    assert_eq!(stats.move_to_calls(), 1);
    assert_eq!(stats.move_next_calls(), 2);

    // a rewind starts over with a seek
    assert!(view.move_before_first());
    assert!(view.move_next());
    assert_eq!(stats.move_to_calls(), 2);
    assert_eq!(view.get_i32(0).unwrap(), 4);
}

#[test]
fn test_move_previous_always_seeks() {
    let backing = forward_only(10);
    let stats = backing.statistics();
    let mut view = FilteredView::owned(Box::new(backing), &[1, 2, 3]).unwrap();

    assert!(view.move_last());
    assert!(view.move_previous());
    assert_eq!(view.get_i32(0).unwrap(), 2);
    assert_eq!(stats.move_to_calls(), 2);
    assert_eq!(stats.move_previous_calls(), 0);
}

#[test]
fn test_move_before_first_is_idempotent() {
    let mut ds = numbers(5);
    let mut view = FilteredView::borrowed(&mut ds, &[0, 1]).unwrap();
    assert!(view.move_last());
    for _ in 0..3 {
        assert!(view.move_before_first());
        assert!(view.is_before_begin());
        assert_eq!(view.position(), Position::BeforeFirst);
    }
    assert!(view.get_i32(0).unwrap_err().is_invalid_position());
}

#[test]
fn test_forward_replay_stops_on_short_stream() {
    let backing = forward_only(10).fail_move_next_after(2);
    let stats = backing.statistics();
    let mut view = FilteredView::owned(Box::new(backing), &[0, 5, 9]).unwrap();

    assert!(view.move_first());
    assert!(!view.move_next());
    assert!(view.is_after_end());
    assert_eq!(stats.move_next_calls(), 3);
    assert!(view.get_i32(0).unwrap_err().is_invalid_position());

    // no catching up on a later call
    assert!(!view.move_next());
    assert_eq!(stats.move_next_calls(), 3);

    // an explicit reposition is still a plain seek
    assert!(view.move_to(2));
    assert_eq!(view.get_i32(0).unwrap(), 9);
}

#[test]
fn test_failed_seek_ends_view() {
    let backing = InstrumentedCursor::new(numbers(10)).fail_move_to_after(1);
    let stats = backing.statistics();
    let mut view = FilteredView::owned(Box::new(backing), &[2, 4, 8]).unwrap();

    assert!(view.move_first());
    assert_eq!(view.get_i32(0).unwrap(), 2);

    // the backing source drops out on the next seek
    assert!(!view.move_last());
    assert!(view.is_after_end());
    assert_eq!(view.source_position(), None);
    assert!(view.get_i32(0).unwrap_err().is_invalid_position());
    assert!(!view.move_next());
    assert_eq!(stats.move_to_calls(), 2);
    assert_eq!(stats.failed_moves(), 1);
}

#[test]
fn test_failed_seek_then_recover() {
    let mut ds = numbers(10);
    let mut source = ds.shallow_clone();
    let mut view = FilteredView::borrowed(&mut source, &[3, 6]).unwrap();
    assert!(view.move_first());

    // rows 6..10 disappear from the shared storage
    assert!(ds.move_to(6));
    for _ in 0..4 {
        ds.remove_current().unwrap();
    }
    assert_eq!(ds.size(), Some(6));

    assert!(!view.move_last());
    assert!(view.is_after_end());
    assert!(view.get_i32(0).unwrap_err().is_invalid_position());
    assert!(view.get_i32_by_name("id").unwrap_err().is_invalid_position());

    // once they are back a later seek lands normally
    for i in 6..10 {
        ds.add(DataSetItem::from_values(vec![
            Some(Value::Int32(i)),
            Some(Value::String(format!("row{i}"))),
        ]))
        .unwrap();
    }
    assert!(view.move_to(1));
    assert_eq!(view.get_i32(0).unwrap(), 6);
    assert!(view.move_previous());
    assert_eq!(view.get_string(1).unwrap(), "row3");
}

#[test]
fn test_owned_view_releases_cursor() {
    let backing = InstrumentedCursor::new(numbers(4));
    let stats = backing.statistics();
    let mut view = FilteredView::owned(Box::new(backing), &[1, 3]).unwrap();
    assert!(view.is_owned());
    assert!(view.move_first());
    drop(view);
    assert_eq!(stats.releases(), 1);
}

#[test]
fn test_borrowed_view_leaves_cursor_usable() {
    let mut backing = InstrumentedCursor::new(numbers(4));
    let stats = backing.statistics();
    {
        let mut view = FilteredView::borrowed(&mut backing, &[1, 3]).unwrap();
        assert!(!view.is_owned());
        assert!(view.move_last());
        assert_eq!(view.get_i32(0).unwrap(), 3);
    }
    assert_eq!(stats.releases(), 0);

    assert!(backing.move_first());
    assert_eq!(backing.get_string(1).unwrap(), "row0");
    drop(backing);
    assert_eq!(stats.releases(), 1);
}

#[test]
fn test_view_over_view() {
    let mut ds = numbers(10);
    let mut inner = FilteredView::borrowed(&mut ds, &[9, 1, 5, 3, 7]).unwrap();
    let mut outer = FilteredView::borrowed(&mut inner, &[4, 0, 2]).unwrap();

    let mut ids = vec![];
    while outer.move_next() {
        ids.push(outer.get_i32(0).unwrap());
    }
    assert_eq!(ids, vec![1, 5, 9]);
    assert!(outer.is_after_end());
}

#[test]
fn test_view_over_trait_object() {
    let boxed: Box<dyn Cursor> = Box::new(numbers(6));
    let mut view: FilteredView<'_, dyn Cursor> = FilteredView::owned(boxed, &[5, 2]).unwrap();
    assert!(view.move_last());
    assert_eq!(view.get_value(0).unwrap(), Some(Value::Int32(5)));
    assert_eq!(view.get_value_by_name("label").unwrap(), Some(Value::from("row5")));
}

#[test]
fn test_explicit_capabilities_override_backing() {
    let mut ds = numbers(6);
    let mut counted = InstrumentedCursor::new(&mut ds);
    let stats = counted.statistics();
    let options = ViewOptions::with_capabilities(Capabilities::new().with_efficient_move(false));
    let mut view = FilteredView::new(CursorHolder::Borrowed(&mut counted), &[0, 2, 4], options)
        .unwrap();

    while view.move_next() {}
    assert_eq!(stats.move_to_calls(), 1);
    assert_eq!(stats.move_next_calls(), 4);
}

#[test]
fn test_materialize_view() {
    let mut ds = numbers(8);
    let mut view = FilteredView::borrowed(&mut ds, &[6, 0, 3]).unwrap();
    let mut copy = MemoryDataSet::from_cursor(&mut view, None).unwrap();

    assert_eq!(copy.size(), Some(3));
    assert_eq!(copy.property_name(1).unwrap(), "label");
    assert!(copy.move_last());
    assert_eq!(copy.get_i32(0).unwrap(), 6);
}

#[test]
fn test_metadata_passes_through() {
    let mut ds = numbers(3);
    let view = FilteredView::borrowed(&mut ds, &[2]).unwrap();
    assert_eq!(view.num_properties(), 2);
    assert_eq!(view.property_data_type(1).unwrap(), DataType::String);
    assert_eq!(view.dataset_name_of_property(0).unwrap(), "numbers");
    assert_eq!(view.traverse_type(), rowset::TraverseType::Random);
    assert!(!view.is_connected());
    assert!(view.property_name(2).unwrap_err().is_index_out_of_range());
}
