#![allow(dead_code)]

use papermap_dataset::{Dataset, DatasetDocuments};
use serde_json::{Value, json};

pub fn dataset(bundle: Value) -> Dataset {
    let documents: DatasetDocuments = serde_json::from_value(bundle).unwrap();
    Dataset::from_documents(documents)
}

/// A small corpus touching every level of every column.
pub fn corpus() -> Dataset {
    dataset(json!({
        "hierarchy": {
            "Content": {
                "l1_to_l2": {"Privacy": ["Consent", "Tracking"], "Health": []},
                "l2_to_l3": {"Privacy-Consent": ["Cookie banners", "Dark patterns"]}
            },
            "Method": {
                "l1_to_l2": {"Surveys": ["Online", "Interviews"], "Experiments": ["Field"]},
                "l2_to_l3": {"Surveys-Online": ["Panels", "Crowdsourcing"]}
            }
        },
        "metadata": {
            "Content": {
                "Privacy": {"displayName": "Privacy", "color": "#PLACEHOLDER", "level": 2},
                "Health": {"displayName": "Health", "color": "#00aa00", "level": 2},
                "Consent": {"displayName": "Consent", "level": 3, "parent": "Privacy"},
                "Tracking": {"displayName": "Tracking", "color": "#aa0000", "level": 3},
                "Cookie banners": {"displayName": "Cookie banners", "level": 4},
                "Dark patterns": {"displayName": "Dark patterns", "level": 4}
            },
            "Method": {
                "Surveys": {"displayName": "Surveys", "color": "#0000aa", "level": 2},
                "Experiments": {"displayName": "Experiments", "level": 2},
                "Online": {"displayName": "Online", "level": 3},
                "Interviews": {"displayName": "Interviews", "level": 3},
                "Field": {"displayName": "Field", "level": 3},
                "Panels": {"displayName": "Panels", "level": 4},
                "Crowdsourcing": {"displayName": "Crowdsourcing", "level": 4}
            }
        },
        "connections": {
            "connections": {
                "Platform-ContentForm_L2__Content_L1": {
                    "Video__Privacy": {"paperCount": 3, "paperIds": ["p1", "p2", "p3"], "connectionStrength": "strong"},
                    "Text__Health": {"paperCount": 1, "paperIds": ["p4"]},
                    "Video__Health": {"paperCount": 1, "paperIds": ["p5"]}
                },
                "Platform-ContentForm_L3__Content_L1": {
                    "Short video__Privacy": {"paperCount": 2, "paperIds": ["p1", "p2"]},
                    "Live__Privacy": {"paperCount": 2, "paperIds": ["p2", "p3"]},
                    "Live__Health": {"paperCount": 1, "paperIds": ["p5"]}
                },
                "Platform-Attribute_L2__Content_L1": {
                    "Open__Privacy": {"paperCount": 2, "paperIds": ["p1", "p2"]},
                    "Closed__Health": {"paperCount": 1, "paperIds": ["p4"]}
                },
                "Content_L1__Method_L1": {
                    "Privacy__Surveys": {"paperCount": 2, "paperIds": ["p1", "p2"]},
                    "Privacy__Experiments": {"paperCount": 1, "paperIds": ["p3"]},
                    "Health__Surveys": {"paperCount": 2, "paperIds": ["p4", "p5"]}
                },
                "Content_L2__Method_L1": {
                    "Consent__Surveys": {"paperCount": 2, "paperIds": ["p1", "p2"]},
                    "Tracking__Experiments": {"paperCount": 1, "paperIds": ["p3"]}
                },
                "Method_L2__Content_L1": {
                    "Online__Privacy": {"paperCount": 1, "paperIds": ["p1"]},
                    "Interviews__Privacy": {"paperCount": 1, "paperIds": ["p2"]},
                    "Interviews__Health": {"paperCount": 2, "paperIds": ["p4", "p5"]},
                    "Field__Privacy": {"paperCount": 1, "paperIds": ["p3"]}
                }
            }
        },
        "platforms": {
            "platformTypes": {
                "ContentForm": {"hierarchy": {
                    "l1": [{"id": "Video", "name": "Video", "color": "#123456"}, "Text"],
                    "l2": {"Video": ["Short video", "Live"], "Text": []}
                }},
                "Attribute": {"hierarchy": {
                    "l1": ["Open", "Closed"],
                    "l2": {"Open": ["Forum"]}
                }}
            },
            "switchMapping": {
                "ContentForm_to_Attribute": {"Video": ["Open"]},
                "Attribute_to_ContentForm": {"Open": ["Video"]}
            }
        },
        "papers": [
            {"id": "p1", "year": 2020},
            {"id": "p2", "year": 2021},
            {"id": "p3", "year": 2021},
            {"id": "p4", "year": "2020"}
        ]
    }))
}
