//! Lowering of semantic types and functions to JVM types and descriptors.

use crate::compat::SyntheticFunction;
use crate::diagnostics::Diagnostic;
use crate::hir::{ClassDef, FnDef, PrimitiveTy, SymbolGraph, Type, TypeKind};
use crate::ice_err;

use super::args::DefaultMask;
use super::insn::InvokeOpcode;

pub const OBJECT_INTERNAL_NAME: &str = "java/lang/Object";

/// A JVM type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AsmType {
    Void,
    Boolean,
    Byte,
    Char,
    Short,
    Int,
    Float,
    Long,
    Double,
    /// A class or interface, by internal name.
    Object(String),
    Array(Box<AsmType>),
}

impl AsmType {
    pub fn object(internal_name: &str) -> Self {
        AsmType::Object(internal_name.to_string())
    }

    pub fn java_object() -> Self {
        AsmType::object(OBJECT_INTERNAL_NAME)
    }

    pub fn primitive(prim: PrimitiveTy) -> Self {
        match prim {
            PrimitiveTy::Boolean => AsmType::Boolean,
            PrimitiveTy::Byte => AsmType::Byte,
            PrimitiveTy::Short => AsmType::Short,
            PrimitiveTy::Char => AsmType::Char,
            PrimitiveTy::Int => AsmType::Int,
            PrimitiveTy::Long => AsmType::Long,
            PrimitiveTy::Float => AsmType::Float,
            PrimitiveTy::Double => AsmType::Double,
        }
    }

    pub fn as_primitive(&self) -> Option<PrimitiveTy> {
        match self {
            AsmType::Boolean => Some(PrimitiveTy::Boolean),
            AsmType::Byte => Some(PrimitiveTy::Byte),
            AsmType::Short => Some(PrimitiveTy::Short),
            AsmType::Char => Some(PrimitiveTy::Char),
            AsmType::Int => Some(PrimitiveTy::Int),
            AsmType::Long => Some(PrimitiveTy::Long),
            AsmType::Float => Some(PrimitiveTy::Float),
            AsmType::Double => Some(PrimitiveTy::Double),
            AsmType::Void | AsmType::Object(_) | AsmType::Array(_) => None,
        }
    }

    /// The wrapper class type of a primitive.
    pub fn boxed(prim: PrimitiveTy) -> Self {
        AsmType::Object(prim.boxed_class_name().replace('.', "/"))
    }

    pub fn is_void(&self) -> bool {
        matches!(self, AsmType::Void)
    }

    pub fn is_reference(&self) -> bool {
        matches!(self, AsmType::Object(_) | AsmType::Array(_))
    }

    pub fn descriptor(&self) -> String {
        match self {
            AsmType::Void => "V".to_string(),
            AsmType::Boolean => "Z".to_string(),
            AsmType::Byte => "B".to_string(),
            AsmType::Char => "C".to_string(),
            AsmType::Short => "S".to_string(),
            AsmType::Int => "I".to_string(),
            AsmType::Float => "F".to_string(),
            AsmType::Long => "J".to_string(),
            AsmType::Double => "D".to_string(),
            AsmType::Object(name) => format!("L{};", name),
            AsmType::Array(element) => format!("[{}", element.descriptor()),
        }
    }

    /// The operand of `checkcast`: the internal name of a class, the
    /// descriptor of an array.
    pub fn internal_name(&self) -> String {
        match self {
            AsmType::Object(name) => name.clone(),
            other => other.descriptor(),
        }
    }

    /// Prefix of typed opcodes (`i` in `iload`, `a` in `aastore`).
    pub fn opcode_prefix(&self) -> &'static str {
        match self {
            AsmType::Boolean | AsmType::Byte | AsmType::Char | AsmType::Short | AsmType::Int => "i",
            AsmType::Long => "l",
            AsmType::Float => "f",
            AsmType::Double => "d",
            AsmType::Object(_) | AsmType::Array(_) => "a",
            AsmType::Void => "",
        }
    }

    /// Stack slots taken by a value of this type.
    pub fn size(&self) -> usize {
        match self {
            AsmType::Void => 0,
            AsmType::Long | AsmType::Double => 2,
            _ => 1,
        }
    }
}

pub fn method_descriptor(params: &[AsmType], return_type: &AsmType) -> String {
    let params: String = params.iter().map(AsmType::descriptor).collect();
    format!("({}){}", params, return_type.descriptor())
}

/// A function lowered to a callable JVM method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallableMethod {
    pub owner: String,
    pub name: String,
    pub descriptor: String,
    /// JVM types of the value parameters, without the dispatch receiver.
    pub value_parameter_types: Vec<AsmType>,
    pub return_type: AsmType,
    pub opcode: InvokeOpcode,
    pub is_interface: bool,
}

/// Maps semantic types and functions to their JVM form.
#[derive(Debug, Clone, Copy)]
pub struct TypeMapper<'g> {
    graph: &'g SymbolGraph,
}

impl<'g> TypeMapper<'g> {
    pub fn new(graph: &'g SymbolGraph) -> Self {
        Self { graph }
    }

    pub fn map_type(&self, ty: &Type) -> AsmType {
        match ty.kind.as_ref() {
            TypeKind::Primitive(prim) => AsmType::primitive(*prim),
            TypeKind::Class { def_id, .. } => match self.graph.class(*def_id) {
                Some(class) => self.map_class(class),
                None => AsmType::java_object(),
            },
            TypeKind::Array { element } => AsmType::Array(Box::new(self.map_type(element))),
            TypeKind::Fn { params, .. } => {
                AsmType::Object(format!("kotlin/jvm/functions/Function{}", params.len()))
            }
            // Erased to the first bound
            TypeKind::Param(id) => self
                .graph
                .type_param(*id)
                .and_then(|param| param.bounds.first())
                .map_or_else(AsmType::java_object, |bound| self.map_type(bound)),
            TypeKind::Intersection(parts) => parts
                .first()
                .map_or_else(AsmType::java_object, |part| self.map_type(part)),
            TypeKind::Unit => AsmType::object("kotlin/Unit"),
            TypeKind::Error => AsmType::object("error/NonExistentClass"),
        }
    }

    /// A missing return type and `Unit` both lower to `void`.
    pub fn map_return_type(&self, ty: Option<&Type>) -> AsmType {
        match ty {
            Some(ty) if !ty.is_unit() => self.map_type(ty),
            _ => AsmType::Void,
        }
    }

    pub fn map_class(&self, class: &ClassDef) -> AsmType {
        AsmType::Object(self.graph.internal_name(class))
    }

    fn owner_of(&self, function: &FnDef) -> Result<&'g ClassDef, Vec<Diagnostic>> {
        self.graph.class(function.owner).map(|c| c.as_ref()).ok_or_else(|| {
            vec![ice_err!(function.span, "function owner is not in the symbol graph";
                "function" => self.graph.name_str(function.name),
                "owner" => function.owner.index())]
        })
    }

    /// Lower a declared function.
    pub fn map_to_callable_method(&self, function: &FnDef) -> Result<CallableMethod, Vec<Diagnostic>> {
        let owner = self.owner_of(function)?;
        let value_parameter_types: Vec<AsmType> = function.param_types().map(|t| self.map_type(t)).collect();
        let return_type = self.map_return_type(function.return_type.as_ref());
        let opcode = if function.is_static {
            InvokeOpcode::Static
        } else if owner.is_interface() {
            InvokeOpcode::Interface
        } else {
            InvokeOpcode::Virtual
        };

        Ok(CallableMethod {
            owner: self.graph.internal_name(owner),
            name: self.graph.name_str(function.name).to_string(),
            descriptor: method_descriptor(&value_parameter_types, &return_type),
            value_parameter_types,
            return_type,
            opcode,
            is_interface: owner.is_interface(),
        })
    }

    /// Lower a synthesized member as if it were declared on its owner.
    /// Only its parameter types are used for emission.
    pub fn map_synthetic(&self, function: &SyntheticFunction) -> Result<CallableMethod, Vec<Diagnostic>> {
        let owner = self.graph.class(function.owner).ok_or_else(|| {
            vec![ice_err!(function.span, "synthesized member owner is not in the symbol graph";
                "function" => self.graph.name_str(function.name))]
        })?;
        let value_parameter_types: Vec<AsmType> = function.param_types().map(|t| self.map_type(t)).collect();
        let return_type = self.map_return_type(function.return_type.as_ref());

        Ok(CallableMethod {
            owner: self.graph.internal_name(owner),
            name: self.graph.name_str(function.name).to_string(),
            descriptor: method_descriptor(&value_parameter_types, &return_type),
            value_parameter_types,
            return_type,
            opcode: InvokeOpcode::Virtual,
            is_interface: owner.is_interface(),
        })
    }

    /// The static `name$default` bridge that fills in default values.
    ///
    /// Its parameters are the dispatch receiver (for members), the value
    /// parameters, one `int` mask per 32 value parameters and a trailing
    /// marker object.
    pub fn map_default_method(&self, function: &FnDef) -> Result<CallableMethod, Vec<Diagnostic>> {
        let owner = self.owner_of(function)?;
        let method = self.map_to_callable_method(function)?;

        let mut params = Vec::with_capacity(method.value_parameter_types.len() + 3);
        if !function.is_static {
            params.push(self.map_class(owner));
        }
        params.extend(method.value_parameter_types.iter().cloned());
        params.extend(std::iter::repeat(AsmType::Int).take(DefaultMask::word_count(function.params.len())));
        params.push(AsmType::java_object());

        Ok(CallableMethod {
            descriptor: method_descriptor(&params, &method.return_type),
            name: format!("{}$default", method.name),
            value_parameter_types: params,
            opcode: InvokeOpcode::Static,
            ..method
        })
    }

    pub fn graph(&self) -> &'g SymbolGraph {
        self.graph
    }
}
