use super::code::Code;
use super::names::{ClassName, TypeName};

/// One generated source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct File {
    /// File name without extension.
    pub name: String,
    pub package: String,
    /// Imports requested on top of the inferred ones, as qualified names.
    pub imports: Vec<String>,
    pub declarations: Vec<Declaration>,
}

impl File {
    pub fn new(name: impl Into<String>, package: impl Into<String>) -> Self {
        File {
            name: name.into(),
            package: package.into(),
            imports: Vec::new(),
            declarations: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Declaration {
    TypeAlias(TypeAlias),
    Class(ClassLike),
    Function(Function),
    Property(Property),
    EnumEntry(EnumEntry),
}

impl Declaration {
    pub fn name(&self) -> &str {
        match self {
            Declaration::TypeAlias(d) => &d.name,
            Declaration::Class(d) => &d.name,
            Declaration::Function(d) => &d.name,
            Declaration::Property(d) => &d.name,
            Declaration::EnumEntry(d) => &d.name,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Visibility {
    #[default]
    Public,
    Internal,
    Protected,
    Private,
}

impl Visibility {
    /// The keyword, `None` for the default visibility.
    pub fn keyword(&self) -> Option<&'static str> {
        match self {
            Visibility::Public => None,
            Visibility::Internal => Some("internal"),
            Visibility::Protected => Some("protected"),
            Visibility::Private => Some("private"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modifier {
    Abstract,
    Open,
    Override,
    Data,
    Sealed,
    Value,
    Companion,
    Suspend,
    Const,
}

impl Modifier {
    pub fn keyword(&self) -> &'static str {
        match self {
            Modifier::Abstract => "abstract",
            Modifier::Open => "open",
            Modifier::Override => "override",
            Modifier::Data => "data",
            Modifier::Sealed => "sealed",
            Modifier::Value => "value",
            Modifier::Companion => "companion",
            Modifier::Suspend => "suspend",
            Modifier::Const => "const",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotation {
    pub class: ClassName,
    pub args: Vec<Code>,
}

impl Annotation {
    pub fn new(class: ClassName) -> Self {
        Annotation {
            class,
            args: Vec::new(),
        }
    }

    pub fn with_arg(mut self, arg: Code) -> Self {
        self.args.push(arg);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeParam {
    pub name: String,
    pub bounds: Vec<TypeName>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeAlias {
    pub name: String,
    pub doc: Option<String>,
    pub visibility: Visibility,
    pub type_params: Vec<TypeParam>,
    pub ty: TypeName,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassKind {
    Class,
    Interface,
    /// `object`; a companion object has an empty name.
    Singleton,
    Enum,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassLike {
    pub kind: ClassKind,
    pub name: String,
    pub doc: Option<String>,
    pub annotations: Vec<Annotation>,
    pub visibility: Visibility,
    pub modifiers: Vec<Modifier>,
    pub type_params: Vec<TypeParam>,
    /// Primary constructor; `None` renders no parentheses at all.
    pub constructor: Option<Vec<Parameter>>,
    pub supertypes: Vec<TypeName>,
    /// Enum entries first, then everything else.
    pub members: Vec<Declaration>,
}

impl ClassLike {
    pub fn new(kind: ClassKind, name: impl Into<String>) -> Self {
        ClassLike {
            kind,
            name: name.into(),
            doc: None,
            annotations: Vec::new(),
            visibility: Visibility::Public,
            modifiers: Vec::new(),
            type_params: Vec::new(),
            constructor: None,
            supertypes: Vec::new(),
            members: Vec::new(),
        }
    }
}

/// How a constructor parameter doubles as a property.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Binding {
    #[default]
    None,
    Val,
    Var,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    pub name: String,
    pub ty: TypeName,
    pub default: Option<Code>,
    /// Rendered inline, before the name.
    pub annotations: Vec<Annotation>,
    pub visibility: Visibility,
    pub modifiers: Vec<Modifier>,
    pub binding: Binding,
}

impl Parameter {
    pub fn new(name: impl Into<String>, ty: TypeName) -> Self {
        Parameter {
            name: name.into(),
            ty,
            default: None,
            annotations: Vec::new(),
            visibility: Visibility::Public,
            modifiers: Vec::new(),
            binding: Binding::None,
        }
    }

    pub fn with_default(mut self, default: Code) -> Self {
        self.default = Some(default);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FunctionBody {
    /// `{ ... }`; the code holds complete lines.
    Block(Code),
    /// `= expr`
    Expression(Code),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Function {
    pub name: String,
    pub doc: Option<String>,
    pub annotations: Vec<Annotation>,
    pub visibility: Visibility,
    pub modifiers: Vec<Modifier>,
    pub type_params: Vec<TypeParam>,
    pub receiver: Option<TypeName>,
    pub params: Vec<Parameter>,
    /// `None` for `Unit`.
    pub returns: Option<TypeName>,
    /// `None` for abstract declarations.
    pub body: Option<FunctionBody>,
}

impl Function {
    pub fn new(name: impl Into<String>) -> Self {
        Function {
            name: name.into(),
            doc: None,
            annotations: Vec::new(),
            visibility: Visibility::Public,
            modifiers: Vec::new(),
            type_params: Vec::new(),
            receiver: None,
            params: Vec::new(),
            returns: None,
            body: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    pub name: String,
    pub doc: Option<String>,
    pub annotations: Vec<Annotation>,
    pub visibility: Visibility,
    pub modifiers: Vec<Modifier>,
    pub mutable: bool,
    pub ty: Option<TypeName>,
    pub initializer: Option<Code>,
}

impl Property {
    pub fn new(name: impl Into<String>, ty: TypeName) -> Self {
        Property {
            name: name.into(),
            doc: None,
            annotations: Vec::new(),
            visibility: Visibility::Public,
            modifiers: Vec::new(),
            mutable: false,
            ty: Some(ty),
            initializer: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumEntry {
    pub name: String,
    pub doc: Option<String>,
    /// Rendered inline, before the name.
    pub annotations: Vec<Annotation>,
}
