// Environment variable utils

use std::{env, str::FromStr};

/// Gets boolean env var
///
/// # Arguments
///
/// * `var_name` - The name of the environment variable
/// * `default_val` - The default value
///
/// # Return value
///
/// Returns true if the value of the variable is 'YES' or 'TRUE' (Case insensitive)
/// Returns false if the value of the variable is 'NO' or 'FALSE' (Case insensitive)
/// Otherwise, returns the value of default_val
pub fn get_env_bool(var_name: &str, default_val: bool) -> bool {
    match env::var(var_name) {
        Ok(var_str) => parse_bool(&var_str).unwrap_or(default_val),
        Err(_) => default_val,
    }
}

/// Gets string env var
///
/// # Arguments
///
/// * `var_name` - The name of the environment variable
/// * `default_val` - The default value
///
/// # Return value
///
/// Returns The value of the variable as string or,
/// if not present, the value of default_val
pub fn get_env_string(var_name: &str, default_val: &str) -> String {
    match env::var(var_name) {
        Ok(var_str) => var_str,
        Err(_) => default_val.to_string(),
    }
}

/// Gets u32 env var
///
/// Accepts decimal values, or hexadecimal values prefixed with 0x
///
/// # Arguments
///
/// * `var_name` - The name of the environment variable
/// * `default_val` - The default value
///
/// # Return value
///
/// Returns The value of the variable as u32 or,
/// if not present or invalid, the value of default_val
pub fn get_env_u32(var_name: &str, default_val: u32) -> u32 {
    match env::var(var_name) {
        Ok(var_str) => parse_u32(&var_str).unwrap_or(default_val),
        Err(_) => default_val,
    }
}

/// Gets usize env var
pub fn get_env_usize(var_name: &str, default_val: usize) -> usize {
    match env::var(var_name) {
        Ok(var_str) => parse_number(&var_str).unwrap_or(default_val),
        Err(_) => default_val,
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_uppercase().as_str() {
        "YES" | "TRUE" => Some(true),
        "NO" | "FALSE" => Some(false),
        _ => None,
    }
}

fn parse_u32(s: &str) -> Option<u32> {
    let s = s.trim();

    match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16).ok(),
        None => parse_number(s),
    }
}

fn parse_number<T: FromStr>(s: &str) -> Option<T> {
    s.trim().parse().ok()
}

// Tests
