use super::*;

fn attributes() -> BlockAttributes {
  BlockAttributes::from_seed(0xabc123)
}

#[test]
fn test_status_follows_navigation_events() {
  let mut status = NavStatus::default();
  status.apply(&NavEvent::StateChanged {
    level: 8,
    stack_depth: 2,
    selected_token: Some("1f4".into()),
  });
  status.apply(&NavEvent::DepthChanged { can_go_back: true });

  assert_eq!(status.level, 8);
  assert_eq!(status.stack_depth, 2);
  assert_eq!(status.selected_token.as_deref(), Some("1f4"));
  assert!(status.can_go_back);
  assert!(status.block.is_none());
}

#[test]
fn test_status_tracks_selected_block() {
  let mut status = NavStatus::default();
  status.apply(&NavEvent::CellSelected {
    token: "1f4abc".into(),
    lat: 10.0,
    lng: 20.0,
    level: 16,
    attributes: attributes(),
  });
  let block = status.block.clone().unwrap();
  assert_eq!(block.level, 16);
  assert_eq!(block.at, LatLng::new(10.0, 20.0));
  assert_eq!(block.attributes, attributes());

  status.apply(&NavEvent::CellDeselected);
  assert!(status.block.is_none());
}

#[test]
fn test_pending_commands_drain_in_order() {
  let mut pending = PendingCommands::default();
  pending.push(NavCommand::GoBack);
  pending.push(NavCommand::Reset);
  let drained: Vec<_> = pending.drain().collect();
  assert_eq!(drained, vec![NavCommand::GoBack, NavCommand::Reset]);
  assert!(pending.is_empty());
}

#[test]
fn test_event_channel_round_trip() {
  let channel = NavEventChannel::default();
  let mut sink = channel.sender.clone();
  lunar_grid::EventSink::emit(&mut sink, NavEvent::CellDeselected);
  assert_eq!(channel.receiver.try_recv(), Ok(NavEvent::CellDeselected));
}

#[test]
fn test_deeper_layers_draw_on_top() {
  assert!(depth_bias(CollectionId::Persistent(0)) < depth_bias(CollectionId::Persistent(1)));
  assert!(depth_bias(CollectionId::Persistent(5)) < depth_bias(CollectionId::Active));
  assert!(depth_bias(CollectionId::Active) < depth_bias(CollectionId::Hover));
}

#[test]
fn test_empty_strip_list_clears_lines() {
  let mut lines = GridLines::default();
  lines.set(
    CollectionId::Persistent(0),
    vec![SceneStrip {
      points: vec![Vec3::X, Vec3::Y],
      color: Color::WHITE,
    }],
  );
  assert_eq!(lines.iter().count(), 1);
  lines.set(CollectionId::Persistent(0), Vec::new());
  assert_eq!(lines.iter().count(), 0);
}
