// Application layer: wires CLI commands to sources, core logic and output.

pub mod commands;
