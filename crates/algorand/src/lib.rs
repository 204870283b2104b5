/// Algorand app spec loading and Go client generation
pub mod codegen;

pub use codegen::{
    generate_client_code, AlgorandClientCodegen, AlgorandCodegenConfig, AppSpecParser, SpecFormat,
};
