mod common;

use common::{corpus, dataset};
use papermap_core::{Column, ConnectionStrength, NodeId, PaperId, PlatformType};
use papermap_dataset::Dataset;
use papermap_graph::{
    InteractionState, NodeTier, Snapshot, SnapshotOptions, SnapshotPath, build_snapshot,
    build_snapshot_with,
};
use serde_json::json;

fn snapshot(dataset: &Dataset, state: &InteractionState) -> Snapshot {
    build_snapshot(dataset, state, &SnapshotOptions::default())
}

fn papers(ids: &[&str]) -> Vec<PaperId> {
    ids.iter().map(|id| PaperId::from(*id)).collect()
}

fn ids<'a>(snapshot: &'a Snapshot, column: Column) -> Vec<&'a str> {
    snapshot.nodes_in(column).map(|node| node.id.as_str()).collect()
}

#[test]
fn test_initial_snapshot_shows_every_l1_node() {
    let dataset = corpus();
    let snapshot = snapshot(&dataset, &InteractionState::default());

    assert_eq!(ids(&snapshot, Column::Platform), vec!["Video", "Text"]);
    assert_eq!(ids(&snapshot, Column::Method), vec!["Experiments", "Surveys"]);
    assert_eq!(ids(&snapshot, Column::Content), vec!["Health", "Privacy"]);

    let video = snapshot.node(Column::Platform, "Video").unwrap();
    assert_eq!(video.color, "#123456");
    assert_eq!(video.value, 4);
    assert!(video.has_children);
    assert!(!snapshot.node(Column::Platform, "Text").unwrap().has_children);

    // Placeholder colors fall back to the column default.
    let privacy = snapshot.node(Column::Content, "Privacy").unwrap();
    assert_eq!(privacy.color, SnapshotOptions::default().colors.content);
    assert_eq!(privacy.value, 3);
    assert_eq!(snapshot.node(Column::Content, "Health").unwrap().color, "#00aa00");
}

#[test]
fn test_initial_links_follow_l1_tables() {
    let dataset = corpus();
    let snapshot = snapshot(&dataset, &InteractionState::default());

    assert_eq!(snapshot.links.len(), 6);
    let video_privacy = snapshot.link("Video", "Privacy").unwrap();
    assert_eq!(video_privacy.paper_ids, papers(&["p1", "p2", "p3"]));
    assert_eq!(video_privacy.value, 3);
    assert_eq!(video_privacy.connection_strength, Some(ConnectionStrength::Strong));

    let health_surveys = snapshot.link("Health", "Surveys").unwrap();
    assert_eq!(health_surveys.value, 2);
    assert_eq!(health_surveys.connection_strength, Some(ConnectionStrength::Weak));
}

#[test]
fn test_snapshot_is_idempotent() {
    let dataset = corpus();
    let mut state = InteractionState::default();
    state.expand(&dataset, Column::Content, "Privacy");
    state.expand(&dataset, Column::Method, "Surveys");

    let first = snapshot(&dataset, &state);
    let second = snapshot(&dataset, &state);
    assert_eq!(first, second);
}

#[test]
fn test_l1_shortcut_matches_general_path() {
    let dataset = corpus();
    let options = SnapshotOptions::default();
    let mut state = InteractionState::default();

    let fast = build_snapshot_with(&dataset, &state, &options, SnapshotPath::Auto);
    let general = build_snapshot_with(&dataset, &state, &options, SnapshotPath::General);
    assert_eq!(fast, general);

    state.select_year(Some("2021".to_string()));
    let fast = build_snapshot_with(&dataset, &state, &options, SnapshotPath::Auto);
    let general = build_snapshot_with(&dataset, &state, &options, SnapshotPath::General);
    assert_eq!(fast, general);
}

#[test]
fn test_year_filter_drops_emptied_links() {
    let dataset = corpus();
    let mut state = InteractionState::default();
    state.select_year(Some("2021".to_string()));
    let snapshot = snapshot(&dataset, &state);

    let video_privacy = snapshot.link("Video", "Privacy").unwrap();
    assert_eq!(video_privacy.paper_ids, papers(&["p2", "p3"]));
    // Filtered edges are re-classified from their remaining papers.
    assert_eq!(video_privacy.connection_strength, Some(ConnectionStrength::Weak));
    assert!(snapshot.link("Text", "Health").is_none());
    // p5 has no recorded year and passes every filter.
    assert_eq!(snapshot.link("Video", "Health").unwrap().paper_ids, papers(&["p5"]));
}

#[test]
fn test_coarse_table_splits_across_children() {
    let dataset = corpus();
    let mut state = InteractionState::default();
    assert!(state.expand(&dataset, Column::Content, "Privacy"));
    let snapshot = snapshot(&dataset, &state);

    assert_eq!(ids(&snapshot, Column::Content), vec!["Consent", "Tracking"]);
    let consent = snapshot.node(Column::Content, "Consent").unwrap();
    assert_eq!(
        consent.tier,
        NodeTier::L2 {
            parent_id: NodeId::from("Privacy"),
            original_id: NodeId::from("Consent"),
        }
    );
    // Inherits nothing: own color is missing and the parent only has a placeholder.
    assert_eq!(consent.color, SnapshotOptions::default().colors.content);
    assert_eq!(snapshot.node(Column::Content, "Tracking").unwrap().color, "#aa0000");

    let to_consent = snapshot.link("Video", "Consent").unwrap();
    let to_tracking = snapshot.link("Video", "Tracking").unwrap();
    assert_eq!(to_consent.paper_ids, papers(&["p1", "p2"]));
    assert_eq!(to_tracking.paper_ids, papers(&["p3"]));
    assert_eq!(to_consent.value + to_tracking.value, 3);
    assert!(snapshot.link("Text", "Health").is_none());

    // The exact L2 table serves the content-method pair.
    assert_eq!(
        snapshot.link("Consent", "Surveys").unwrap().paper_ids,
        papers(&["p1", "p2"])
    );
    assert_eq!(
        snapshot.link("Tracking", "Experiments").unwrap().paper_ids,
        papers(&["p3"])
    );
}

#[test]
fn test_split_conserves_paper_total() {
    let dataset = dataset(json!({
        "hierarchy": {
            "Content": {"l1_to_l2": {"Privacy": ["A", "B", "C"]}},
            "Method": {"l1_to_l2": {"Surveys": []}}
        },
        "metadata": {
            "Content": {
                "Privacy": {"displayName": "Privacy", "level": 2},
                "A": {"displayName": "A", "level": 3},
                "B": {"displayName": "B", "level": 3},
                "C": {"displayName": "C", "level": 3}
            },
            "Method": {"Surveys": {"displayName": "Surveys", "level": 2}}
        },
        "connections": {"connections": {
            "Content_L1__Method_L1": {
                "Privacy__Surveys": {
                    "paperIds": ["p1", "p2", "p3", "p4", "p5", "p6", "p7", "p8", "p9"]
                }
            }
        }}
    }));
    let mut state = InteractionState::default();
    assert!(state.expand(&dataset, Column::Content, "Privacy"));
    let snapshot = snapshot(&dataset, &state);

    let values: Vec<usize> = ["A", "B", "C"]
        .iter()
        .map(|child| snapshot.link(child, "Surveys").unwrap().value)
        .collect();
    assert_eq!(values, vec![3, 3, 3]);
    assert_eq!(values.iter().sum::<usize>(), 9);
    assert_eq!(snapshot.node(Column::Method, "Surveys").unwrap().value, 9);
}

#[test]
fn test_fine_table_folds_and_merges_papers() {
    let dataset = dataset(json!({
        "hierarchy": {
            "Content": {"l1_to_l2": {"Privacy": ["Consent", "Tracking"]}},
            "Method": {"l1_to_l2": {"Surveys": []}}
        },
        "metadata": {
            "Content": {
                "Privacy": {"displayName": "Privacy", "level": 2},
                "Consent": {"displayName": "Consent", "level": 3},
                "Tracking": {"displayName": "Tracking", "level": 3}
            },
            "Method": {"Surveys": {"displayName": "Surveys", "level": 2}}
        },
        "connections": {"connections": {
            "Content_L2__Method_L1": {
                "Consent__Surveys": {"paperIds": ["a", "b"], "connectionStrength": "strong"},
                "Tracking__Surveys": {"paperIds": ["b", "c"]}
            }
        }}
    }));
    let snapshot = snapshot(&dataset, &InteractionState::default());

    assert_eq!(snapshot.links.len(), 1);
    let link = snapshot.link("Privacy", "Surveys").unwrap();
    assert_eq!(link.paper_ids, papers(&["a", "b", "c"]));
    assert_eq!(link.value, 3);
    assert_eq!(link.connection_strength, Some(ConnectionStrength::Weak));
    // No L1 table holds Privacy, so its value comes from the merged link.
    assert_eq!(snapshot.node(Column::Content, "Privacy").unwrap().value, 3);
}

#[test]
fn test_reversed_table_serves_method_branches() {
    let dataset = corpus();
    let mut state = InteractionState::default();
    assert!(state.expand(&dataset, Column::Method, "Surveys"));
    assert!(state.expand(&dataset, Column::Method, "Experiments"));
    let snapshot = snapshot(&dataset, &state);

    assert_eq!(
        ids(&snapshot, Column::Method),
        vec!["Online", "Interviews", "Field"]
    );
    assert_eq!(snapshot.link("Privacy", "Online").unwrap().paper_ids, papers(&["p1"]));
    assert_eq!(snapshot.link("Privacy", "Field").unwrap().paper_ids, papers(&["p3"]));
    assert_eq!(
        snapshot.link("Health", "Interviews").unwrap().paper_ids,
        papers(&["p4", "p5"])
    );
    assert_eq!(snapshot.node(Column::Method, "Interviews").unwrap().value, 3);
}

#[test]
fn test_drilled_column_shows_l3_children() {
    let dataset = corpus();
    let mut state = InteractionState::default();
    assert!(state.expand(&dataset, Column::Content, "Privacy"));
    assert!(state.expand(&dataset, Column::Content, "Consent"));
    let snapshot = snapshot(&dataset, &state);

    assert_eq!(
        ids(&snapshot, Column::Content),
        vec!["Cookie banners", "Dark patterns"]
    );
    let banners = snapshot.node(Column::Content, "Cookie banners").unwrap();
    assert_eq!(
        banners.tier,
        NodeTier::L3 {
            parent_id: NodeId::from("Consent"),
            original_l2_parent: NodeId::from("Privacy-Consent"),
        }
    );

    // L1 platform papers split over the drilled leaves.
    assert_eq!(
        snapshot.link("Video", "Cookie banners").unwrap().paper_ids,
        papers(&["p1", "p2"])
    );
    assert_eq!(
        snapshot.link("Video", "Dark patterns").unwrap().paper_ids,
        papers(&["p3"])
    );
    // Tracking is not under the drilled node.
    assert!(snapshot.links.iter().all(|link| link.target.as_str() != "Experiments"));
}

#[test]
fn test_platform_branches_use_platform_l3_table() {
    let dataset = corpus();
    let mut state = InteractionState::default();
    assert!(state.expand(&dataset, Column::Platform, "Video"));
    let snapshot = snapshot(&dataset, &state);

    assert_eq!(ids(&snapshot, Column::Platform), vec!["Short video", "Live"]);
    let live = snapshot.node(Column::Platform, "Live").unwrap();
    assert_eq!(live.color, "#123456");
    assert!(!live.has_children);
    assert_eq!(
        snapshot.link("Live", "Privacy").unwrap().paper_ids,
        papers(&["p2", "p3"])
    );
    assert_eq!(snapshot.link("Live", "Health").unwrap().paper_ids, papers(&["p5"]));
    // Platform stops at L2.
    assert!(!state.expand(&dataset, Column::Platform, "Live"));
}

#[test]
fn test_childless_expand_leaves_snapshot_unchanged() {
    let dataset = corpus();
    let mut state = InteractionState::default();
    let before = snapshot(&dataset, &state);

    assert!(!state.expand(&dataset, Column::Content, "Health"));
    assert!(!state.expand(&dataset, Column::Platform, "Text"));
    assert!(!state.can_undo());
    assert_eq!(snapshot(&dataset, &state), before);
}

#[test]
fn test_switch_platform_type_translates_branches() {
    let dataset = corpus();
    let mut state = InteractionState::default();
    state.expand(&dataset, Column::Platform, "Video");
    assert!(state.switch_platform_type(&dataset, PlatformType::Attribute));
    let snapshot = snapshot(&dataset, &state);

    assert_eq!(ids(&snapshot, Column::Platform), vec!["Forum"]);
    let forum = snapshot.link("Forum", "Privacy").unwrap();
    assert_eq!(forum.paper_ids, papers(&["p1", "p2"]));
    assert_eq!(snapshot.links.iter().filter(|link| link.source.as_str() == "Forum").count(), 1);

    assert!(state.undo());
    assert_eq!(state.platform_type(), PlatformType::ContentForm);
}

#[test]
fn test_switch_platform_type_keeps_drilled_content() {
    let dataset = corpus();
    let mut state = InteractionState::default();
    state.expand(&dataset, Column::Platform, "Video");
    state.expand(&dataset, Column::Content, "Privacy");
    state.expand(&dataset, Column::Content, "Consent");
    assert!(state.switch_platform_type(&dataset, PlatformType::Attribute));
    assert_eq!(state.column_level(Column::Content), papermap_core::Level::L3);
    let snapshot = snapshot(&dataset, &state);

    assert_eq!(ids(&snapshot, Column::Platform), vec!["Forum"]);
    assert_eq!(
        ids(&snapshot, Column::Content),
        vec!["Cookie banners", "Dark patterns"]
    );
    // The L1 attribute table splits on both sides: one platform child, two leaves.
    assert_eq!(
        snapshot.link("Forum", "Cookie banners").unwrap().paper_ids,
        papers(&["p1"])
    );
    assert_eq!(
        snapshot.link("Forum", "Dark patterns").unwrap().paper_ids,
        papers(&["p2"])
    );
    assert_eq!(
        snapshot.link("Cookie banners", "Surveys").unwrap().paper_ids,
        papers(&["p1"])
    );
    assert_eq!(snapshot.links.len(), 4);
}

#[test]
fn test_coarse_table_splits_over_both_expanded_sides() {
    let dataset = dataset(json!({
        "hierarchy": {
            "Content": {"l1_to_l2": {"Privacy": ["Consent", "Tracking"]}},
            "Method": {"l1_to_l2": {"Surveys": ["Online", "Interviews"]}}
        },
        "metadata": {
            "Content": {
                "Privacy": {"displayName": "Privacy", "level": 2},
                "Consent": {"displayName": "Consent", "level": 3},
                "Tracking": {"displayName": "Tracking", "level": 3}
            },
            "Method": {
                "Surveys": {"displayName": "Surveys", "level": 2},
                "Online": {"displayName": "Online", "level": 3},
                "Interviews": {"displayName": "Interviews", "level": 3}
            }
        },
        "connections": {"connections": {
            "Content_L1__Method_L1": {
                "Privacy__Surveys": {"paperIds": ["p1", "p2", "p3", "p4", "p5", "p6", "p7"]}
            }
        }}
    }));
    let mut state = InteractionState::default();
    assert!(state.expand(&dataset, Column::Content, "Privacy"));
    assert!(state.expand(&dataset, Column::Method, "Surveys"));
    let snapshot = snapshot(&dataset, &state);

    // Sources outer, targets inner, ceil(7 / 4) papers per pair.
    let pairs = [
        ("Consent", "Online", vec!["p1", "p2"]),
        ("Consent", "Interviews", vec!["p3", "p4"]),
        ("Tracking", "Online", vec!["p5", "p6"]),
        ("Tracking", "Interviews", vec!["p7"]),
    ];
    for (source, target, expected) in &pairs {
        let link = snapshot.link(source, target).unwrap();
        assert_eq!(link.paper_ids, papers(expected), "{source} -> {target}");
    }
    assert_eq!(snapshot.links.len(), 4);
    assert_eq!(snapshot.links.iter().map(|link| link.value).sum::<usize>(), 7);

    let value = |column, id| snapshot.node(column, id).unwrap().value;
    assert_eq!(value(Column::Content, "Consent"), 4);
    assert_eq!(value(Column::Content, "Tracking"), 3);
    assert_eq!(value(Column::Method, "Online"), 4);
    assert_eq!(value(Column::Method, "Interviews"), 3);
}

#[test]
fn test_leaf_l2_is_not_confused_with_a_longer_sibling() {
    let dataset = dataset(json!({
        "hierarchy": {
            "Content": {"l1_to_l2": {"Privacy": []}},
            "Method": {
                "l1_to_l2": {"Surveys": ["Online", "Online panels"]},
                "l2_to_l3": {"Surveys-Online panels": ["Panels"]}
            }
        },
        "metadata": {
            "Content": {"Privacy": {"displayName": "Privacy", "level": 2}},
            "Method": {
                "Surveys": {"displayName": "Surveys", "level": 2},
                "Online": {"displayName": "Online", "level": 3},
                "Online panels": {"displayName": "Online panels", "level": 3}
            }
        },
        "connections": {"connections": {
            "Content_L1__Method_L2": {
                "Privacy__Surveys-Online panels": {"paperIds": ["p1"]}
            }
        }}
    }));
    let mut state = InteractionState::default();
    assert!(state.expand(&dataset, Column::Method, "Surveys"));
    let before = snapshot(&dataset, &state);

    assert!(!before.node(Column::Method, "Online").unwrap().has_children);
    assert!(before.node(Column::Method, "Online panels").unwrap().has_children);
    assert_eq!(
        before.link("Privacy", "Online panels").unwrap().paper_ids,
        papers(&["p1"])
    );
    assert!(before.link("Privacy", "Online").is_none());
    assert_eq!(before.node(Column::Method, "Online").unwrap().value, 1);

    assert!(!state.expand(&dataset, Column::Method, "Online"));
    assert_eq!(snapshot(&dataset, &state), before);
}

#[test]
fn test_shared_display_names_stay_distinct_nodes() {
    let dataset = dataset(json!({
        "hierarchy": {
            "Content": {"l1_to_l2": {
                "Privacy": ["Privacy-Other"],
                "Health": ["Health-Other"]
            }},
            "Method": {"l1_to_l2": {"Surveys": []}}
        },
        "metadata": {
            "Content": {
                "Privacy": {"displayName": "Privacy", "level": 2},
                "Health": {"displayName": "Health", "level": 2},
                "Privacy-Other": {"displayName": "Other", "level": 3},
                "Health-Other": {"displayName": "Other", "level": 3}
            },
            "Method": {"Surveys": {"displayName": "Surveys", "level": 2}}
        },
        "connections": {"connections": {
            "Content_L2__Method_L1": {
                "Privacy-Other__Surveys": {"paperIds": ["p1"]},
                "Health-Other__Surveys": {"paperIds": ["p2", "p3"]}
            }
        }}
    }));
    let mut state = InteractionState::default();
    assert!(state.expand(&dataset, Column::Content, "Privacy"));
    assert!(state.expand(&dataset, Column::Content, "Health"));
    let snapshot = snapshot(&dataset, &state);

    assert_eq!(
        ids(&snapshot, Column::Content),
        vec!["Privacy-Other", "Health-Other"]
    );
    assert!(snapshot.nodes_in(Column::Content).all(|node| node.name == "Other"));
    assert_eq!(snapshot.node(Column::Content, "Privacy-Other").unwrap().value, 1);
    assert_eq!(snapshot.node(Column::Content, "Health-Other").unwrap().value, 2);
    assert_eq!(
        snapshot.link("Privacy-Other", "Surveys").unwrap().paper_ids,
        papers(&["p1"])
    );
    assert_eq!(
        snapshot.link("Health-Other", "Surveys").unwrap().paper_ids,
        papers(&["p2", "p3"])
    );
    assert_eq!(snapshot.node(Column::Method, "Surveys").unwrap().value, 3);
}

#[test]
fn test_strength_thresholds_come_from_options() {
    let dataset = corpus();
    let mut options = SnapshotOptions::default();
    options.strength.strong = 2;
    options.strength.medium = 1;
    let snapshot = build_snapshot(&dataset, &InteractionState::default(), &options);

    assert_eq!(
        snapshot.link("Health", "Surveys").unwrap().connection_strength,
        Some(ConnectionStrength::Strong)
    );
    assert_eq!(
        snapshot.link("Text", "Health").unwrap().connection_strength,
        Some(ConnectionStrength::Medium)
    );
}

#[test]
fn test_empty_dataset_gives_empty_snapshot() {
    let dataset = Dataset::default();
    let mut state = InteractionState::default();
    assert!(snapshot(&dataset, &state).is_empty());

    state.select_year(Some("2020".to_string()));
    assert!(!state.expand(&dataset, Column::Content, "Privacy"));
    assert!(snapshot(&dataset, &state).is_empty());
}

#[test]
fn test_missing_table_leaves_nodes_without_links() {
    let dataset = dataset(json!({
        "hierarchy": {"Content": {"l1_to_l2": {"Privacy": []}}},
        "metadata": {"Content": {"Privacy": {"displayName": "Privacy", "level": 2}}}
    }));
    let snapshot = snapshot(&dataset, &InteractionState::default());

    assert_eq!(ids(&snapshot, Column::Content), vec!["Privacy"]);
    assert_eq!(snapshot.node(Column::Content, "Privacy").unwrap().value, 1);
    assert!(snapshot.links.is_empty());
}

fn single_edge_dataset() -> Dataset {
    dataset(json!({
        "hierarchy": {"Content": {"l1_to_l2": {"catX": []}}},
        "metadata": {"Content": {"catX": {"displayName": "catX", "level": 2}}},
        "connections": {"connections": {
            "Platform-ContentForm_L2__Content_L1": {
                "platA__catX": {"paperCount": 5, "paperIds": ["p1", "p2", "p3", "p4", "p5"]}
            }
        }},
        "platforms": {"platformTypes": {"ContentForm": {"hierarchy": {"l1": ["platA"]}}}}
    }))
}

#[test]
fn test_single_l1_edge_becomes_one_link() {
    let dataset = single_edge_dataset();
    let snapshot = snapshot(&dataset, &InteractionState::default());

    assert!(snapshot.node(Column::Platform, "platA").is_some());
    assert!(snapshot.node(Column::Content, "catX").is_some());
    let link = snapshot.link("platA", "catX").unwrap();
    assert_eq!(link.value, 5);
    assert_eq!(link.paper_ids, papers(&["p1", "p2", "p3", "p4", "p5"]));
}

#[test]
fn test_expand_platform_without_children_is_noop() {
    let dataset = single_edge_dataset();
    let mut state = InteractionState::default();

    assert!(!state.expand(&dataset, Column::Platform, "platA"));
    assert_eq!(state.column_level(Column::Platform), papermap_core::Level::L1);
    assert!(state.expanded_nodes(Column::Platform).is_empty());
}
