//! Fixed IRIs of the summary vocabulary.
//!
//! Summaries describe a source with the `ds:` (summaries) vocabulary and encode
//! their approximate membership filters with the `amf:` vocabulary.

use oxigraph::model::NamedNodeRef;

pub const RDF: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
pub const DCT: &str = "http://purl.org/dc/terms/";
pub const AMF: &str = "http://semweb.mmlab.be/ns/membership#";
pub const DS: &str = "http://semweb.mmlab.be/ns/summaries#";

pub mod rdf {
    use super::NamedNodeRef;

    pub const TYPE: NamedNodeRef<'static> =
        NamedNodeRef::new_unchecked("http://www.w3.org/1999/02/22-rdf-syntax-ns#type");
}

pub mod dct {
    use super::NamedNodeRef;

    /// Relation that switches a triple pattern into source-selection mode.
    pub const IS_PART_OF: NamedNodeRef<'static> =
        NamedNodeRef::new_unchecked("http://purl.org/dc/terms/isPartOf");
}

pub mod ds {
    use super::NamedNodeRef;

    pub const SUMMARY: NamedNodeRef<'static> =
        NamedNodeRef::new_unchecked("http://semweb.mmlab.be/ns/summaries#Summary");
    pub const CAPABILITY: NamedNodeRef<'static> =
        NamedNodeRef::new_unchecked("http://semweb.mmlab.be/ns/summaries#capability");
    pub const OBJ_FILTER: NamedNodeRef<'static> =
        NamedNodeRef::new_unchecked("http://semweb.mmlab.be/ns/summaries#objFilter");
    pub const PREDICATE: NamedNodeRef<'static> =
        NamedNodeRef::new_unchecked("http://semweb.mmlab.be/ns/summaries#predicate");
}

pub mod amf {
    use super::NamedNodeRef;

    pub const BITS: NamedNodeRef<'static> =
        NamedNodeRef::new_unchecked("http://semweb.mmlab.be/ns/membership#bits");
    pub const HASHES: NamedNodeRef<'static> =
        NamedNodeRef::new_unchecked("http://semweb.mmlab.be/ns/membership#hashes");
    pub const FILTER: NamedNodeRef<'static> =
        NamedNodeRef::new_unchecked("http://semweb.mmlab.be/ns/membership#filter");
}
