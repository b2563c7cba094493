#[macro_export]
macro_rules! parse_address {
    ($addr:tt) => {
        $addr
            .parse::<alloy::primitives::Address>()
            .expect("static address literal")
    };
}

#[macro_export]
macro_rules! fork_version {
    ($version:literal) => {
        alloy::primitives::aliases::B32::from(u32::to_be_bytes($version))
    };
}

/// One aligned `label: value` row of a diagnostic report, the value is
/// green when `$ok` holds and red otherwise
#[macro_export]
macro_rules! report_row {
    ($align:expr, $label:expr, $value:expr, $ok:expr) => {
        format!(
            "    {:align$}{}",
            format!("{}:", $label).white().bold(),
            match $ok {
                true => format!("{}", $value).green(),
                false => format!("{}", $value).red().bold(),
            },
            align = $align
        )
    };
}

pub(crate) use fork_version;
pub(crate) use parse_address;
pub(crate) use report_row;
