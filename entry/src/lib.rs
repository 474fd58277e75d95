use rip_derip::lib_rip_derip;
use rip_index::lib_rip_index;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    Derip,
    Index,
}

impl Tool {
    pub fn name(&self) -> &'static str {
        match self {
            Tool::Derip => "rip-derip",
            Tool::Index => "rip-index",
        }
    }
}

/// run a rip-tool in-process with its own argument list
pub fn lib(tool: Tool, args: Vec<String>) -> anyhow::Result<()> {
    log::info!("Running {} with args: {:?}", tool.name(), args);

    match tool {
        Tool::Derip => lib_rip_derip(args),
        Tool::Index => lib_rip_index(args),
    }
}
