use papermap_dataset::documents::{
    ConnectionsDocument, EdgeInfo, HierarchyMapping, NodeMeta, PaperRecord,
    PlatformConfigurationDocument, PlatformHierarchyDocument, PlatformL1Entry,
    PlatformTypeDocument, YearValue,
};
use papermap_core::PaperId;
use papermap_dataset::{Dataset, DatasetDocuments};
use std::collections::BTreeMap;

const PAPER_POOL: usize = 5_000;

struct Taxonomy {
    l1: Vec<String>,
    l2: Vec<(String, String)>,
    l3: Vec<(String, String)>,
}

/// Three-level taxonomy with `width` children per node, ids prefixed by `prefix`.
fn taxonomy(prefix: &str, width: usize) -> Taxonomy {
    let mut taxonomy = Taxonomy {
        l1: Vec::new(),
        l2: Vec::new(),
        l3: Vec::new(),
    };
    for i in 0..width {
        let l1 = format!("{prefix}{i}");
        for j in 0..width {
            let l2 = format!("{l1}s{j}");
            for k in 0..width {
                taxonomy.l3.push((format!("{l1}-{l2}"), format!("{l2}t{k}")));
            }
            taxonomy.l2.push((l1.clone(), l2));
        }
        taxonomy.l1.push(l1);
    }
    taxonomy
}

fn meta(id: &str, level: u8, parent: Option<&str>) -> NodeMeta {
    NodeMeta {
        display_name: Some(id.to_string()),
        level,
        parent: parent.map(str::to_string),
        ..NodeMeta::default()
    }
}

fn hierarchy_documents(taxonomy: &Taxonomy) -> (HierarchyMapping, BTreeMap<String, NodeMeta>) {
    let mut mapping = HierarchyMapping::default();
    let mut metadata = BTreeMap::new();
    for l1 in &taxonomy.l1 {
        metadata.insert(l1.clone(), meta(l1, 2, None));
    }
    for (parent, l2) in &taxonomy.l2 {
        mapping.l1_to_l2.entry(parent.clone()).or_default().push(l2.clone());
        metadata.insert(l2.clone(), meta(l2, 3, Some(parent)));
    }
    for (parent, l3) in &taxonomy.l3 {
        mapping.l2_to_l3.entry(parent.clone()).or_default().push(l3.clone());
        metadata.insert(l3.clone(), meta(l3, 4, None));
    }
    (mapping, metadata)
}

/// Fully connected table between two id lists, with overlapping paper lists.
fn table(sources: &[&str], targets: &[&str], papers_per_edge: usize) -> BTreeMap<String, EdgeInfo> {
    let mut edges = BTreeMap::new();
    let mut seed = 0usize;
    for source in sources {
        for target in targets {
            let papers: Vec<String> = (0..papers_per_edge)
                .map(|n| format!("p{}", (seed * 7 + n) % PAPER_POOL))
                .collect();
            let ids: Vec<&str> = papers.iter().map(String::as_str).collect();
            edges.insert(format!("{source}__{target}"), EdgeInfo::new(&ids));
            seed += 1;
        }
    }
    edges
}

fn ids<'a>(nodes: impl IntoIterator<Item = &'a String>) -> Vec<&'a str> {
    nodes.into_iter().map(String::as_str).collect()
}

/// A corpus with `width` children per node in every taxonomy.
pub fn synthetic_dataset(width: usize, papers_per_edge: usize) -> Dataset {
    let content = taxonomy("C", width);
    let method = taxonomy("M", width);
    let platform = taxonomy("V", width);

    let mut documents = DatasetDocuments::default();
    for (name, taxonomy) in [("Content", &content), ("Method", &method)] {
        let (mapping, metadata) = hierarchy_documents(taxonomy);
        documents.hierarchy.insert(name.to_string(), mapping);
        documents.metadata.insert(name.to_string(), metadata);
    }

    let content_l1 = ids(&content.l1);
    let content_l2 = ids(content.l2.iter().map(|(_, id)| id));
    let method_l1 = ids(&method.l1);
    let method_l2 = ids(method.l2.iter().map(|(_, id)| id));
    let platform_l1 = ids(&platform.l1);
    let platform_l2 = ids(platform.l2.iter().map(|(_, id)| id));

    let mut connections = ConnectionsDocument::default();
    for (key, edges) in [
        ("Platform-ContentForm_L2__Content_L1", table(&platform_l1, &content_l1, papers_per_edge)),
        ("Platform-ContentForm_L3__Content_L1", table(&platform_l2, &content_l1, papers_per_edge)),
        ("Platform-ContentForm_L2__Content_L2", table(&platform_l1, &content_l2, papers_per_edge)),
        ("Content_L1__Method_L1", table(&content_l1, &method_l1, papers_per_edge)),
        ("Content_L2__Method_L1", table(&content_l2, &method_l1, papers_per_edge)),
        ("Content_L2__Method_L2", table(&content_l2, &method_l2, papers_per_edge)),
    ] {
        connections.connections.insert(key.to_string(), edges);
    }
    documents.connections = connections;

    let mut hierarchy = PlatformHierarchyDocument::default();
    for l1 in &platform.l1 {
        hierarchy.l1.push(PlatformL1Entry {
            id: l1.clone(),
            name: l1.clone(),
            color: None,
        });
    }
    for (parent, l2) in &platform.l2 {
        hierarchy.l2.entry(parent.clone()).or_default().push(l2.clone());
    }
    let mut platforms = PlatformConfigurationDocument::default();
    platforms.platform_types.insert(
        "ContentForm".to_string(),
        PlatformTypeDocument {
            hierarchy,
            ..PlatformTypeDocument::default()
        },
    );
    documents.platforms = platforms;

    documents.papers = (0..PAPER_POOL)
        .map(|n| PaperRecord {
            id: PaperId::from(format!("p{n}").as_str()),
            year: Some(YearValue::Number(2018 + (n % 5) as i64)),
        })
        .collect();

    Dataset::from_documents(documents)
}
