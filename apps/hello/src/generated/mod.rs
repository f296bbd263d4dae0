// @generated
// This file wires up buf-generated protobuf code
// Note: The prost files already include!() the tonic files automatically

pub mod hello {
    pub mod v1 {
        include!("hello.v1.rs");
        // hello.v1.tonic.rs is auto-included by hello.v1.rs
    }
}
