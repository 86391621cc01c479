use pdf_writer::Ref;
use std::collections::HashMap;

/// Every kind of indirect object the document writer emits, keyed so that
/// pages can look up the references of resources written before them
#[derive(Eq, PartialEq, Hash, Copy, Clone, Debug)]
pub(crate) enum RefType {
    Catalog,
    Info,
    PageTree,
    Page(usize),
    ContentForPage(usize),
    Font(usize),
    CidFont(usize),
    ToUnicode(usize),
    FontDescriptor(usize),
    FontData(usize),
    Image(usize),
    ImageMask(usize),
    /// A graphics state setting fill and stroke alpha to the given byte
    Opacity(u8),
}

pub(crate) struct ObjectReferences {
    refs: HashMap<RefType, Ref>,
    next_id: i32,
}

impl ObjectReferences {
    pub fn new() -> ObjectReferences {
        ObjectReferences {
            refs: HashMap::new(),
            next_id: 1,
        }
    }

    pub fn get(&self, ref_type: RefType) -> Option<Ref> {
        self.refs.get(&ref_type).copied()
    }

    /// Allocate a fresh reference for `ref_type`, replacing any earlier one
    pub fn gen(&mut self, ref_type: RefType) -> Ref {
        let id = Ref::new(self.next_id);
        self.next_id += 1;
        self.refs.insert(ref_type, id);
        id
    }
}
