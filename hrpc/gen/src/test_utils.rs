//! Shared test fixtures for hrpc-gen unit tests.

use hrpc_define::parse_schema;

use crate::model::{BindingModel, MethodSlot, ServiceBinding, SessionShape, TypeRef, build_model};
use crate::naming::binding_name;
use crate::options::SessionLayout;

/// One service with a message-typed method and a void method.
pub const TEST_SCHEMA: &str = r#"
message TestRequest {
  required string name = 1;
}

message TestResponse {
  optional string res = 1;
}

service Test {
  rpc test (TestRequest) returns (TestResponse);
  rpc boring (Void) returns (Void);
}
"#;

/// The per-service model of [`TEST_SCHEMA`].
pub fn test_model() -> BindingModel {
    let schema = parse_schema(TEST_SCHEMA).unwrap();
    build_model(&schema, &SessionLayout::PerService).unwrap().0
}

/// Creates a void-to-void method slot.
pub fn make_method(name: &str, id: u32) -> MethodSlot {
    MethodSlot {
        name: name.to_string(),
        binding_name: binding_name(name),
        id,
        request: TypeRef::Void,
        response: TypeRef::Void,
    }
}

/// Creates a service binding with the standard derived names.
pub fn make_service(name: &str, id: u32, methods: Vec<MethodSlot>) -> ServiceBinding {
    ServiceBinding {
        name: name.to_string(),
        id,
        field_name: binding_name(name),
        class_name: format!("HRPCService{}", name),
        methods,
    }
}

/// Wraps services in a per-service model.
pub fn make_model(services: Vec<ServiceBinding>) -> BindingModel {
    BindingModel {
        services,
        session: SessionShape::PerService,
    }
}
