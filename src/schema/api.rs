use super::*;

impl<M> Schema<M>
{
    /// Name of the message type.
    pub fn name(&self) -> &str
    {
        &self.name
    }

    /// Iterates the fields in field number order, which is also the order they are encoded in.
    pub fn iter_fields(&self) -> impl Iterator<Item = &FieldDescriptor<M>>
    {
        self.fields.values()
    }

    /// Gets a field by a number it occupies on the wire.
    ///
    /// The number of any alternative of a oneof group resolves to the group.
    pub fn get_field(&self, number: u32) -> Option<&FieldDescriptor<M>>
    {
        self.route(number).map(|(field, _)| field)
    }

    /// Gets a field by name.
    pub fn get_field_by_name(&self, name: &str) -> Option<&FieldDescriptor<M>>
    {
        self.fields_by_name
            .get(name)
            .and_then(|number| self.fields.get(number))
    }

    /// True if the type captures unknown fields.
    pub fn has_unknown_fields(&self) -> bool
    {
        self.unknown.is_some()
    }

    pub(crate) fn route(&self, number: u32) -> Option<(&FieldDescriptor<M>, Route)>
    {
        let route = *self.routes.get(&number)?;
        self.fields.get(&route.head).map(|field| (field, route))
    }

    pub(crate) fn unknown_fields<'a>(&self, msg: &'a M) -> Option<&'a UnknownFields>
    {
        self.unknown.as_ref().map(|access| (access.get)(msg))
    }

    pub(crate) fn unknown_fields_mut<'a>(&self, msg: &'a mut M) -> Option<&'a mut UnknownFields>
    {
        match &self.unknown {
            Some(access) => Some((access.get_mut)(msg)),
            None => None,
        }
    }
}
