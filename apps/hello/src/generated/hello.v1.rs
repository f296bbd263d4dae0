// @generated
// This file is @generated by prost-build.
#[derive(Clone, PartialEq, Eq, Hash, ::prost::Message)]
pub struct HelloRequest {
    #[prost(string, tag = "1")]
    pub name: ::prost::alloc::string::String,
}
#[derive(Clone, PartialEq, Eq, Hash, ::prost::Message)]
pub struct HelloResponse {
    #[prost(string, tag = "1")]
    pub greeting: ::prost::alloc::string::String,
}
include!("hello.v1.tonic.rs");
// @@protoc_insertion_point(module)
