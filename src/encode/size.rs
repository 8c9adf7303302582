use crate::value::Message;

/// Body lengths of nested messages, recorded by the size pass for the write pass.
///
/// Slots are in preorder: a message reserves its slot before visiting its fields, so a parent's
/// length always comes before the lengths of its children. Map entries are treated as virtual
/// messages and get a slot of their own.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SizeTable
{
    slots: Vec<usize>,
}

impl SizeTable
{
    /// Creates an empty table.
    pub fn new() -> Self
    {
        Default::default()
    }

    /// Number of recorded lengths.
    pub fn len(&self) -> usize
    {
        self.slots.len()
    }

    /// True if no nested message has been sized.
    pub fn is_empty(&self) -> bool
    {
        self.slots.is_empty()
    }

    /// Recorded lengths in the order the write pass consumes them.
    pub fn as_slice(&self) -> &[usize]
    {
        &self.slots
    }

    /// Reserves a slot to be filled once the nested body has been sized.
    pub(crate) fn reserve(&mut self) -> usize
    {
        self.slots.push(0);
        self.slots.len() - 1
    }

    pub(crate) fn fill(&mut self, slot: usize, len: usize)
    {
        self.slots[slot] = len;
    }
}

/// Length of the body of `msg`: its fields followed by its unknown fields.
pub(crate) fn message_len<M: Message>(msg: &M, sizes: &mut SizeTable) -> usize
{
    let schema = M::schema();

    let mut len = 0;
    for field in schema.iter_fields() {
        len += field.access.encoded_len(msg, field.number, sizes);
    }

    if let Some(unknown) = schema.unknown_fields(msg) {
        len += unknown.encoded_len();
    }

    len
}
