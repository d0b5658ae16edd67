//! Schema checks performed before any code is emitted.
//!
//! A schema that fails here produces no output at all: type references must
//! resolve, ids must be unique within their scope, and a flattened session
//! must name a declared service.

use std::collections::HashMap;

use hrpc_define::Schema;
use tracing::debug;

use crate::errors::GeneratorError;
use crate::model::{BindingModel, SessionShape, TypeRef};
use crate::options::SessionLayout;
use crate::void::is_void;

/// Resolves the request or response type of `service.method`.
///
/// ## Errors
///
/// Returns [`GeneratorError::UnresolvedType`] if `type_name` is neither void
/// nor a declared message.
pub fn resolve_type(
    schema: &Schema,
    service: &str,
    method: &str,
    type_name: &str,
) -> Result<TypeRef, GeneratorError> {
    if is_void(schema, type_name) {
        return Ok(TypeRef::Void);
    }

    schema
        .local_path(type_name)
        .map(|path| TypeRef::Message(path.to_string()))
        .ok_or_else(|| GeneratorError::UnresolvedType {
            service: service.to_string(),
            method: method.to_string(),
            type_name: type_name.to_string(),
        })
}

/// Maps the requested layout onto the schema.
///
/// ## Errors
///
/// Returns [`GeneratorError::ServiceNotFound`] if a flattened layout names a
/// service the schema does not declare.
pub fn resolve_session(schema: &Schema, layout: &SessionLayout) -> Result<SessionShape, GeneratorError> {
    match layout {
        SessionLayout::PerService => Ok(SessionShape::PerService),
        SessionLayout::Flattened { service } => {
            if schema.service(service).is_none() {
                return Err(GeneratorError::ServiceNotFound {
                    name: service.clone(),
                    available: schema.services.iter().map(|s| s.name.clone()).collect(),
                });
            }
            Ok(SessionShape::Flattened {
                service: service.clone(),
            })
        }
    }
}

/// Checks that service ids, and method ids within each service, are unique.
///
/// ## Errors
///
/// Returns the first [`GeneratorError::DuplicateServiceId`] or
/// [`GeneratorError::DuplicateMethodId`] found, in declaration order.
pub fn check_unique_ids(model: &BindingModel) -> Result<(), GeneratorError> {
    let mut services: HashMap<u32, &str> = HashMap::new();

    for service in &model.services {
        if let Some(first) = services.insert(service.id, &service.name) {
            return Err(GeneratorError::DuplicateServiceId {
                id: service.id,
                first: first.to_string(),
                second: service.name.clone(),
            });
        }

        let mut methods: HashMap<u32, &str> = HashMap::new();
        for method in &service.methods {
            if let Some(first) = methods.insert(method.id, &method.name) {
                return Err(GeneratorError::DuplicateMethodId {
                    service: service.name.clone(),
                    id: method.id,
                    first: first.to_string(),
                    second: method.name.clone(),
                });
            }
        }
    }

    debug!(services = model.services.len(), "ids are unique");
    Ok(())
}

#[cfg(test)]
mod tests {
    use hrpc_define::parse_schema;

    use super::*;
    use crate::test_utils::{make_method, make_model, make_service};

    #[test]
    fn resolves_messages_and_void() {
        let schema = parse_schema("package demo; message Ping {}").unwrap();

        assert_eq!(resolve_type(&schema, "S", "m", "Void").unwrap(), TypeRef::Void);
        assert_eq!(resolve_type(&schema, "S", "m", "NULL").unwrap(), TypeRef::Void);
        assert_eq!(
            resolve_type(&schema, "S", "m", "Ping").unwrap(),
            TypeRef::Message("Ping".to_string())
        );
        assert_eq!(
            resolve_type(&schema, "S", "m", ".demo.Ping").unwrap(),
            TypeRef::Message("Ping".to_string())
        );
    }

    #[test]
    fn unknown_type_is_rejected() {
        let schema = parse_schema("message Ping {}").unwrap();
        let err = resolve_type(&schema, "Test", "test", "Pong").unwrap_err();
        assert!(matches!(
            err,
            GeneratorError::UnresolvedType { ref service, ref method, ref type_name }
                if service == "Test" && method == "test" && type_name == "Pong"
        ));
    }

    #[test]
    fn flattened_layout_requires_declared_service() {
        let schema = parse_schema("service A {} service B {}").unwrap();

        let shape = resolve_session(
            &schema,
            &SessionLayout::Flattened {
                service: "B".to_string(),
            },
        )
        .unwrap();
        assert_eq!(
            shape,
            SessionShape::Flattened {
                service: "B".to_string()
            }
        );

        let err = resolve_session(
            &schema,
            &SessionLayout::Flattened {
                service: "RPC".to_string(),
            },
        )
        .unwrap_err();
        match err {
            GeneratorError::ServiceNotFound { name, available } => {
                assert_eq!(name, "RPC");
                assert_eq!(available, vec!["A", "B"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn duplicate_service_ids_are_rejected() {
        let model = make_model(vec![make_service("A", 1, vec![]), make_service("B", 1, vec![])]);
        let err = check_unique_ids(&model).unwrap_err();
        assert!(matches!(
            err,
            GeneratorError::DuplicateServiceId { id: 1, ref first, ref second } if first == "A" && second == "B"
        ));
    }

    #[test]
    fn duplicate_method_ids_are_rejected() {
        let model = make_model(vec![make_service(
            "A",
            1,
            vec![make_method("x", 2), make_method("y", 2)],
        )]);
        let err = check_unique_ids(&model).unwrap_err();
        assert!(matches!(err, GeneratorError::DuplicateMethodId { id: 2, .. }));
    }

    #[test]
    fn method_ids_may_repeat_across_services() {
        let model = make_model(vec![
            make_service("A", 1, vec![make_method("x", 1)]),
            make_service("B", 2, vec![make_method("x", 1)]),
        ]);
        assert!(check_unique_ids(&model).is_ok());
    }
}
