//! The annotated binding model.
//!
//! [`build_model`] walks the parsed schema once, in declaration order, and
//! attaches everything the emitter needs: wire ids, void classification and
//! binding names. The emitter never looks at the [`Schema`] again.

use hrpc_define::{Schema, ServiceDefinition};
use tracing::{debug, instrument, warn};

use crate::errors::GeneratorError;
use crate::ids::{IdAllocator, METHOD_ID_OPTION, SERVICE_ID_OPTION, explicit_id};
use crate::naming::binding_name;
use crate::options::SessionLayout;
use crate::validation::{check_unique_ids, resolve_session, resolve_type};

/// Prefix of every generated service wrapper class.
pub const SERVICE_CLASS_PREFIX: &str = "HRPCService";

/// Members the flattened session defines itself or inherits from `HRPC`.
/// A promoted method with one of these names replaces the original.
pub const SESSION_MEMBERS: [&str; 11] = [
    "constructor",
    "onRequest",
    "destroy",
    "rawSocket",
    "rawSocketError",
    "emit",
    "on",
    "once",
    "off",
    "removeListener",
    "listenerCount",
];

/// A request or response payload type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeRef {
    /// A declared message, by package-relative path.
    Message(String),
    /// No payload.
    Void,
}

impl TypeRef {
    pub fn is_void(&self) -> bool {
        matches!(self, Self::Void)
    }

    /// The JavaScript expression for this type's codec.
    ///
    /// ```
    /// use hrpc_gen::model::TypeRef;
    ///
    /// assert_eq!(TypeRef::Void.encoding(), "RPC.NULL");
    /// assert_eq!(TypeRef::Message("Ping".into()).encoding(), "messages.Ping");
    /// ```
    pub fn encoding(&self) -> String {
        match self {
            Self::Message(name) => format!("messages.{}", name),
            Self::Void => "RPC.NULL".to_string(),
        }
    }
}

/// A method with its wire id and binding name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodSlot {
    /// Name as declared.
    pub name: String,
    /// Name on the generated wrapper.
    pub binding_name: String,
    pub id: u32,
    pub request: TypeRef,
    pub response: TypeRef,
}

/// A service with its wire id, names and methods.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceBinding {
    /// Name as declared.
    pub name: String,
    pub id: u32,
    /// Session field holding this service's wrapper.
    pub field_name: String,
    /// Generated wrapper class, `HRPCService<Name>`.
    pub class_name: String,
    pub methods: Vec<MethodSlot>,
}

/// How the session exposes its services.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionShape {
    PerService,
    /// The named service is promoted onto the session.
    Flattened { service: String },
}

/// Everything the emitter renders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindingModel {
    pub services: Vec<ServiceBinding>,
    pub session: SessionShape,
}

impl BindingModel {
    pub fn service(&self, name: &str) -> Option<&ServiceBinding> {
        self.services.iter().find(|s| s.name == name)
    }
}

/// Builds the binding model for `schema`.
///
/// Returns the model and the service-scope allocator after the last service.
///
/// ## Errors
///
/// Fails on invalid or duplicate ids, unresolved types, and a flattened
/// layout naming an undeclared service.
#[instrument(skip_all, fields(services = schema.services.len()))]
pub fn build_model(
    schema: &Schema,
    layout: &SessionLayout,
) -> Result<(BindingModel, IdAllocator), GeneratorError> {
    let session = resolve_session(schema, layout)?;

    let mut service_ids = IdAllocator::new();
    let mut pinned_seen = false;
    let mut services = Vec::with_capacity(schema.services.len());

    for service in &schema.services {
        let target = format!("service {}", service.name);
        let explicit = explicit_id(&service.options, SERVICE_ID_OPTION, &target)?;
        warn_if_renumbered(&mut pinned_seen, explicit, || target.clone());

        let (id, next) = service_ids
            .allocate(explicit)
            .ok_or(GeneratorError::IdOverflow { target })?;
        service_ids = next;

        let binding = bind_service(schema, service, id)?;
        debug!(service = %binding.name, id, methods = binding.methods.len(), "bound service");
        services.push(binding);
    }

    let model = BindingModel { services, session };
    check_unique_ids(&model)?;

    if let SessionShape::Flattened { service } = &model.session
        && let Some(binding) = model.service(service)
    {
        for member in shadowed_session_members(binding) {
            warn!(
                service = %binding.name,
                member,
                "promoted method replaces a session member of the same name"
            );
        }
    }

    Ok((model, service_ids))
}

/// Session members a flattened `service` would replace, in method order.
pub fn shadowed_session_members(service: &ServiceBinding) -> Vec<&'static str> {
    service
        .methods
        .iter()
        .flat_map(|method| {
            let name = method.binding_name.as_str();
            SESSION_MEMBERS.iter().copied().filter(move |member| *member == name)
        })
        .collect()
}

fn bind_service(
    schema: &Schema,
    service: &ServiceDefinition,
    id: u32,
) -> Result<ServiceBinding, GeneratorError> {
    let mut method_ids = IdAllocator::new();
    let mut pinned_seen = false;
    let mut methods = Vec::with_capacity(service.methods.len());

    for method in &service.methods {
        let target = format!("method {}.{}", service.name, method.name);
        let explicit = explicit_id(&method.options, METHOD_ID_OPTION, &target)?;
        warn_if_renumbered(&mut pinned_seen, explicit, || target.clone());

        let (method_id, next) = method_ids
            .allocate(explicit)
            .ok_or_else(|| GeneratorError::IdOverflow { target: target.clone() })?;
        method_ids = next;

        methods.push(MethodSlot {
            name: method.name.clone(),
            binding_name: binding_name(&method.name),
            id: method_id,
            request: resolve_type(schema, &service.name, &method.name, &method.input_type)?,
            response: resolve_type(schema, &service.name, &method.name, &method.output_type)?,
        });
    }

    Ok(ServiceBinding {
        name: service.name.clone(),
        id,
        field_name: binding_name(&service.name),
        class_name: format!("{}{}", SERVICE_CLASS_PREFIX, service.name),
        methods,
    })
}

/// Unpinned entries after a pinned one are numbered from the pin, so
/// reordering the schema silently changes their wire ids.
fn warn_if_renumbered(pinned_seen: &mut bool, explicit: Option<u32>, target: impl FnOnce() -> String) {
    match explicit {
        Some(id) if id != 0 => *pinned_seen = true,
        _ if *pinned_seen => {
            warn!(
                entry = %target(),
                "id is derived from a preceding pinned id; pin it explicitly to keep it stable"
            );
        }
        _ => {}
    }
}
