use std::collections::HashMap;

/// What a memory address holds, from the program's point of view.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum AddressTag {
    Instruction,
    Data,
}

/// Per-address information built while a program is loaded.
///
/// The viewer uses the tags to pick a rendering per cell and the
/// label maps to annotate addresses; the debugger resolves breakpoint
/// names through [`address_of`](ProgramMetadata::address_of). An
/// address carries at most one tag, and the label map is injective
/// because every label marks the first word of a distinct emission.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct ProgramMetadata {
    tags: HashMap<u16, AddressTag>,
    label_to_address: HashMap<String, u16>,
    address_to_label: HashMap<u16, String>,
    entry: u16,
}

impl ProgramMetadata {
    pub(crate) fn new(entry: u16) -> ProgramMetadata {
        ProgramMetadata {
            tags: HashMap::new(),
            label_to_address: HashMap::new(),
            address_to_label: HashMap::new(),
            entry,
        }
    }

    pub(crate) fn tag(&mut self, address: u16, tag: AddressTag) {
        self.tags.insert(address, tag);
    }

    pub(crate) fn define_label(&mut self, name: String, address: u16) {
        self.label_to_address.insert(name.clone(), address);
        self.address_to_label.insert(address, name);
    }

    pub fn entry(&self) -> u16 {
        self.entry
    }

    pub fn tag_at(&self, address: u16) -> Option<AddressTag> {
        self.tags.get(&address).copied()
    }

    pub fn is_instruction(&self, address: u16) -> bool {
        self.tag_at(address) == Some(AddressTag::Instruction)
    }

    pub fn is_data(&self, address: u16) -> bool {
        self.tag_at(address) == Some(AddressTag::Data)
    }

    pub fn label_at(&self, address: u16) -> Option<&str> {
        self.address_to_label.get(&address).map(String::as_str)
    }

    pub fn address_of(&self, label: &str) -> Option<u16> {
        self.label_to_address.get(label).copied()
    }

    pub fn label_count(&self) -> usize {
        self.label_to_address.len()
    }
}
