use oxigraph::model::{GraphName, Literal, NamedNode, Quad, Term};
use summary_index::filter::{FilterIndex, FilterIndexBuilder, MembershipFilter};
use summary_index::store::QuadStore;
use summary_index::vocab::{amf, ds};

const SOURCE: &str = "http://example.org/summaries/dbpedia";

fn iri(value: &str) -> NamedNode {
    NamedNode::new(value).unwrap()
}

fn filter_of(values: &[&str]) -> MembershipFilter {
    let mut filter = MembershipFilter::empty(1024, 7).unwrap();
    for value in values {
        filter.add(value.as_bytes());
    }
    filter
}

/// Summary graph writer, one descriptor at a time.
struct Summary {
    store: QuadStore,
    graph: NamedNode,
}

impl Summary {
    fn new(store: &QuadStore, graph: &str) -> Self {
        Self { store: store.clone(), graph: iri(graph) }
    }

    fn add(&self, subject: NamedNode, predicate: NamedNode, object: impl Into<Term>) {
        self.store
            .add_statement(&Quad::new(
                subject,
                predicate,
                object,
                GraphName::NamedNode(self.graph.clone()),
            ))
            .unwrap();
    }

    fn capability(&self, name: &str, predicate: Option<&str>) -> NamedNode {
        let capability = iri(&format!("{}#{}", self.graph.as_str(), name));
        if let Some(predicate) = predicate {
            self.add(capability.clone(), ds::PREDICATE.into_owned(), iri(predicate));
        }
        capability
    }

    fn descriptor(
        &self,
        capability: &NamedNode,
        bits: Option<&str>,
        hashes: Option<&str>,
        encoded: Option<&str>,
    ) {
        let descriptor = iri(&format!("{}-filter", capability.as_str()));
        self.add(capability.clone(), ds::OBJ_FILTER.into_owned(), descriptor.clone());
        if let Some(bits) = bits {
            self.add(descriptor.clone(), amf::BITS.into_owned(), Literal::new_simple_literal(bits));
        }
        if let Some(hashes) = hashes {
            self.add(
                descriptor.clone(),
                amf::HASHES.into_owned(),
                Literal::new_simple_literal(hashes),
            );
        }
        if let Some(encoded) = encoded {
            self.add(descriptor, amf::FILTER.into_owned(), Literal::new_simple_literal(encoded));
        }
    }
}

#[test]
fn test_complete_descriptors_are_indexed() {
    let store = QuadStore::new().unwrap();
    let summary = Summary::new(&store, SOURCE);
    let encoded = filter_of(&["http://dbpedia.org/resource/Ghent"]).to_base64();

    let name = summary.capability("name", Some("http://xmlns.com/foaf/0.1/name"));
    summary.descriptor(&name, Some("1024"), Some("7"), Some(&encoded));

    let index = FilterIndex::new();
    let report = FilterIndexBuilder::new(&store).build(&iri(SOURCE), &index).unwrap();
    assert_eq!(report.descriptors, 1);
    assert_eq!(report.filters, 1);

    let snapshot = index.snapshot();
    assert_eq!(snapshot.version(), report.version);
    let filter = snapshot.get("http://xmlns.com/foaf/0.1/name", SOURCE).unwrap();
    assert!(filter.may_contain(b"http://dbpedia.org/resource/Ghent"));
    assert_eq!(
        snapshot.find_sources("http://dbpedia.org/resource/Ghent", None),
        vec![iri(SOURCE)]
    );
}

#[test]
fn test_incomplete_and_malformed_descriptors_are_skipped() {
    let store = QuadStore::new().unwrap();
    let summary = Summary::new(&store, SOURCE);
    let encoded = filter_of(&["http://dbpedia.org/resource/Ghent"]).to_base64();

    let valid = summary.capability("valid", Some("http://xmlns.com/foaf/0.1/name"));
    summary.descriptor(&valid, Some("1024"), Some("7"), Some(&encoded));

    let no_hashes = summary.capability("no-hashes", Some("http://schema.org/name"));
    summary.descriptor(&no_hashes, Some("1024"), None, Some(&encoded));

    let no_predicate = summary.capability("no-predicate", None);
    summary.descriptor(&no_predicate, Some("1024"), Some("7"), Some(&encoded));

    let bad_base64 = summary.capability("bad-base64", Some("http://schema.org/author"));
    summary.descriptor(&bad_base64, Some("1024"), Some("7"), Some("not*base64!"));

    let bad_bits = summary.capability("bad-bits", Some("http://schema.org/about"));
    summary.descriptor(&bad_bits, Some("many"), Some("7"), Some(&encoded));

    let too_short = summary.capability("too-short", Some("http://schema.org/genre"));
    summary.descriptor(&too_short, Some("4096"), Some("7"), Some(&encoded));

    let index = FilterIndex::new();
    let report = FilterIndexBuilder::new(&store).build(&iri(SOURCE), &index).unwrap();
    assert_eq!(report.descriptors, 6);
    assert_eq!(report.filters, 1);

    let snapshot = index.snapshot();
    assert_eq!(snapshot.len(), 1);
    assert_eq!(snapshot.predicates().collect::<Vec<_>>(), vec!["http://xmlns.com/foaf/0.1/name"]);
}

#[test]
fn test_build_only_reads_its_own_graph() {
    let store = QuadStore::new().unwrap();
    let encoded = filter_of(&["http://viaf.org/viaf/1"]).to_base64();

    let viaf = Summary::new(&store, "http://example.org/summaries/viaf");
    let cap = viaf.capability("creator", Some("http://purl.org/dc/terms/creator"));
    viaf.descriptor(&cap, Some("1024"), Some("7"), Some(&encoded));

    let index = FilterIndex::new();
    let report = FilterIndexBuilder::new(&store).build(&iri(SOURCE), &index).unwrap();
    assert_eq!(report.descriptors, 0);
    assert!(index.snapshot().is_empty());
}

#[test]
fn test_rebuilding_one_source_keeps_the_others() {
    let store = QuadStore::new().unwrap();
    let encoded = filter_of(&["http://example.org/shared"]).to_base64();

    for graph in [SOURCE, "http://example.org/summaries/viaf"] {
        let summary = Summary::new(&store, graph);
        let cap = summary.capability("label", Some("http://www.w3.org/2000/01/rdf-schema#label"));
        summary.descriptor(&cap, Some("1024"), Some("7"), Some(&encoded));
    }

    let index = FilterIndex::new();
    let builder = FilterIndexBuilder::new(&store);
    builder.build(&iri(SOURCE), &index).unwrap();
    builder.build(&iri("http://example.org/summaries/viaf"), &index).unwrap();
    let before = index.snapshot().version();
    builder.build(&iri(SOURCE), &index).unwrap();

    let snapshot = index.snapshot();
    assert!(snapshot.version() > before);
    assert_eq!(snapshot.len(), 2);
    assert_eq!(snapshot.find_sources("http://example.org/shared", None).len(), 2);
}
