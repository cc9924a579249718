// Server configuration

use crate::{
    log::Logger,
    log_error,
    rtmp::RTMP_MAX_HEADER_FIELD,
    utils::{get_env_bool, get_env_string, get_env_u32, get_env_usize},
};

/// Server configuration
#[derive(Clone)]
pub struct RtmpServerConfiguration {
    /// RTMP port
    pub rtmp_port: u32,

    /// HTTP pull port
    pub http_port: u32,

    /// Bind address
    pub bind_address: String,

    /// Window acknowledgement size sent on connect
    pub window_ack_size: u32,

    /// Peer bandwidth sent on connect
    pub peer_bandwidth: u32,

    /// Capacity of the tag channel of each puller
    pub pull_channel_capacity: usize,

    /// Max accepted length of an inbound message
    pub max_message_size: usize,

    /// True to log requests
    pub log_requests: bool,
}

impl RtmpServerConfiguration {
    /// Loads the configuration from the environment
    ///
    /// Invalid values are logged
    pub fn load_from_env(logger: &Logger) -> Result<RtmpServerConfiguration, ()> {
        let rtmp_port = get_env_u32("RTMP_PORT", 1935);

        if rtmp_port == 0 || rtmp_port > 65535 {
            log_error!(logger, format!("RTMP_PORT has an invalid value: {}", rtmp_port));
            return Err(());
        }

        let http_port = get_env_u32("HTTP_PORT", 80);

        if http_port == 0 || http_port > 65535 {
            log_error!(logger, format!("HTTP_PORT has an invalid value: {}", http_port));
            return Err(());
        }

        let bind_address = get_env_string("BIND_ADDRESS", "");

        let window_ack_size = get_env_u32("RTMP_WINDOW_ACK_SIZE", 0x01010101);
        let peer_bandwidth = get_env_u32("RTMP_PEER_BANDWIDTH", 0x01010101);

        let pull_channel_capacity = get_env_usize("PULL_CHANNEL_CAPACITY", 10);

        if pull_channel_capacity == 0 {
            log_error!(logger, "PULL_CHANNEL_CAPACITY must be greater than 0");
            return Err(());
        }

        let max_message_size =
            get_env_usize("RTMP_MAX_MESSAGE_SIZE", RTMP_MAX_HEADER_FIELD as usize);

        if max_message_size == 0 || max_message_size > RTMP_MAX_HEADER_FIELD as usize {
            log_error!(
                logger,
                format!("RTMP_MAX_MESSAGE_SIZE has an invalid value: {}", max_message_size)
            );
            return Err(());
        }

        let log_requests = get_env_bool("LOG_REQUESTS", true);

        Ok(RtmpServerConfiguration {
            rtmp_port,
            http_port,
            bind_address,
            window_ack_size,
            peer_bandwidth,
            pull_channel_capacity,
            max_message_size,
            log_requests,
        })
    }

    /// Gets RTMP address for listening
    pub fn get_tcp_listen_addr(&self) -> String {
        format!("{}:{}", self.get_bind_host(), self.rtmp_port)
    }

    /// Gets HTTP address for listening
    pub fn get_http_listen_addr(&self) -> String {
        format!("{}:{}", self.get_bind_host(), self.http_port)
    }

    /// Bind address, all interfaces if empty
    fn get_bind_host(&self) -> &str {
        if self.bind_address.is_empty() {
            "0.0.0.0"
        } else {
            &self.bind_address
        }
    }
}

impl Default for RtmpServerConfiguration {
    fn default() -> Self {
        RtmpServerConfiguration {
            rtmp_port: 1935,
            http_port: 80,
            bind_address: "".to_string(),
            window_ack_size: 0x01010101,
            peer_bandwidth: 0x01010101,
            pull_channel_capacity: 10,
            max_message_size: RTMP_MAX_HEADER_FIELD as usize,
            log_requests: true,
        }
    }
}

// Tests
