use super::names::{ClassName, MemberName, TypeName};

/// One piece of a code fragment. Types and members stay symbolic until emission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Chunk {
    Text(String),
    Type(TypeName),
    Member(MemberName),
    Newline,
    Indent,
    Unindent,
}

/// A fragment of statements or an expression: function bodies, initializers, defaults.
///
/// Text never contains line breaks; they are separate [`Chunk::Newline`]s so
/// the emitter can indent every line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Code {
    chunks: Vec<Chunk>,
}

impl Code {
    pub fn new() -> Self {
        Code::default()
    }

    /// A single-line fragment.
    pub fn of(text: impl AsRef<str>) -> Self {
        let mut code = Code::new();
        code.text(text);
        code
    }

    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    pub fn text(&mut self, text: impl AsRef<str>) -> &mut Self {
        let mut lines = text.as_ref().split('\n');
        if let Some(first) = lines.next()
            && !first.is_empty()
        {
            self.chunks.push(Chunk::Text(first.to_string()));
        }
        for line in lines {
            self.chunks.push(Chunk::Newline);
            if !line.is_empty() {
                self.chunks.push(Chunk::Text(line.to_string()));
            }
        }
        self
    }

    pub fn ty(&mut self, ty: TypeName) -> &mut Self {
        self.chunks.push(Chunk::Type(ty));
        self
    }

    pub fn class(&mut self, name: ClassName) -> &mut Self {
        self.ty(TypeName::class(name))
    }

    pub fn member(&mut self, member: MemberName) -> &mut Self {
        self.chunks.push(Chunk::Member(member));
        self
    }

    pub fn newline(&mut self) -> &mut Self {
        self.chunks.push(Chunk::Newline);
        self
    }

    /// A full line of plain text.
    pub fn line(&mut self, text: impl AsRef<str>) -> &mut Self {
        self.text(text).newline()
    }

    /// Run `body` one level deeper. The indent is always released.
    pub fn indented(&mut self, body: impl FnOnce(&mut Code)) -> &mut Self {
        self.chunks.push(Chunk::Indent);
        body(self);
        self.chunks.push(Chunk::Unindent);
        self
    }

    pub fn append(&mut self, other: Code) -> &mut Self {
        self.chunks.extend(other.chunks);
        self
    }

    /// Every type and member mentioned, for symbol resolution.
    pub fn references(&self) -> impl Iterator<Item = &Chunk> {
        self.chunks
            .iter()
            .filter(|c| matches!(c, Chunk::Type(_) | Chunk::Member(_)))
    }
}
