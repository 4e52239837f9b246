// src/config/validate.rs

use std::time::Duration;

use globset::Glob;

use crate::config::duration::parse_duration;
use crate::config::model::{
    ConfigFile, DebounceSettings, DispatchSettings, PublishSettings, RawConfigFile,
    RawDebounceSection, RawDispatchSection, RawPublishSection,
};
use crate::errors::{Result, SharepushError};

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = crate::errors::SharepushError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_watch(&raw)?;
        validate_notify(&raw)?;
        let debounce = resolve_debounce(&raw.debounce)?;
        let dispatch = resolve_dispatch(&raw.dispatch)?;
        let publish = resolve_publish(&raw.publish)?;
        Ok(ConfigFile::new_unchecked(
            raw.watch, debounce, dispatch, publish, raw.notify,
        ))
    }
}

fn config_error(msg: impl Into<String>) -> SharepushError {
    SharepushError::ConfigError(msg.into())
}

fn duration_field(section: &str, field: &str, value: &str) -> Result<Duration> {
    parse_duration(value).map_err(|e| config_error(format!("[{section}].{field}: {e}")))
}

fn validate_watch(cfg: &RawConfigFile) -> Result<()> {
    if cfg.watch.root.as_os_str().is_empty() {
        return Err(config_error("[watch].root must not be empty"));
    }

    for pattern in cfg.watch.exclude.iter() {
        Glob::new(pattern)?;
    }

    Ok(())
}

fn validate_notify(cfg: &RawConfigFile) -> Result<()> {
    let addrs = [("udp", &cfg.notify.udp), ("tcp", &cfg.notify.tcp)];
    for (field, addr) in addrs {
        if let Some(addr) = addr {
            if addr.trim().is_empty() {
                return Err(config_error(format!(
                    "[notify].{field} must not be blank when set"
                )));
            }
        }
    }
    Ok(())
}

fn resolve_debounce(raw: &RawDebounceSection) -> Result<DebounceSettings> {
    if raw.gap == 0 {
        return Err(config_error("[debounce].gap must be >= 1 (got 0)"));
    }

    let tick = duration_field("debounce", "tick", &raw.tick)?;
    if tick.is_zero() {
        return Err(config_error("[debounce].tick must be greater than zero"));
    }

    Ok(DebounceSettings { gap: raw.gap, tick })
}

fn resolve_dispatch(raw: &RawDispatchSection) -> Result<DispatchSettings> {
    if raw.destinations.is_empty() {
        return Err(config_error(
            "[dispatch].destinations must contain at least one container",
        ));
    }

    if let Some(pos) = raw.destinations.iter().position(|d| d.trim().is_empty()) {
        return Err(config_error(format!(
            "[dispatch].destinations[{pos}] must not be blank"
        )));
    }

    Ok(DispatchSettings {
        destinations: raw.destinations.clone(),
        pre_upload_delay: duration_field("dispatch", "pre_upload_delay", &raw.pre_upload_delay)?,
        post_upload_delay: duration_field(
            "dispatch",
            "post_upload_delay",
            &raw.post_upload_delay,
        )?,
        tail_delay: duration_field("dispatch", "tail_delay", &raw.tail_delay)?,
        notify_per_file_failure: raw.notify_per_file_failure,
    })
}

fn resolve_publish(raw: &RawPublishSection) -> Result<PublishSettings> {
    if raw.program.trim().is_empty() {
        return Err(config_error("[publish].program must not be empty"));
    }

    let timeout = duration_field("publish", "timeout", &raw.timeout)?;
    if timeout.is_zero() {
        return Err(config_error("[publish].timeout must be greater than zero"));
    }

    Ok(PublishSettings {
        program: raw.program.clone(),
        endpoint: raw.endpoint.clone(),
        tenant: raw.tenant.clone(),
        user: raw.user.clone(),
        password: raw.password.clone(),
        metadata: raw.metadata.clone(),
        timeout,
    })
}
