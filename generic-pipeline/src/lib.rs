pub mod intermediates;
pub mod node;
pub mod pipeline;
pub mod plinputs;
pub mod processing;
pub mod systems;
#[cfg(test)]
mod testutil;

/// Bundles the concrete types that a [processing::GenericProcessor] and its
/// [systems::GenericSystem]s operate on.
pub trait PipelineTypes {
    type Spec: node::SpecTrait;
    type IntermediateValue;
    type SystemError;
}
