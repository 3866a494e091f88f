//! MSP command codes
//!
//! MSP v1 carries the command in a single byte. Flight-controller firmwares
//! (MultiWii, Cleanflight, Betaflight, iNav) share most of the table; codes
//! outside it are kept verbatim as [`MspCode::Unknown`].

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

macro_rules! msp_codes {
    ($($name:ident = $value:literal => $label:literal,)*) => {
        /// MSP command code
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
        pub enum MspCode {
            $(
                #[doc = concat!("`", $label, "` (", stringify!($value), ")")]
                $name,
            )*
            /// Code outside the recognized set, carried verbatim
            Unknown(u8),
        }

        impl MspCode {
            /// Every recognized command code
            pub const KNOWN: &'static [Self] = &[$(Self::$name,)*];

            /// Convert from byte. Never fails: unmapped values become `Unknown`.
            #[must_use]
            pub const fn from_u8(value: u8) -> Self {
                match value {
                    $($value => Self::$name,)*
                    other => Self::Unknown(other),
                }
            }

            /// Convert to byte
            #[must_use]
            pub const fn as_u8(self) -> u8 {
                match self {
                    $(Self::$name => $value,)*
                    Self::Unknown(raw) => raw,
                }
            }

            /// Protocol name, `None` for unknown codes
            #[must_use]
            pub const fn name(self) -> Option<&'static str> {
                match self {
                    $(Self::$name => Some($label),)*
                    Self::Unknown(_) => None,
                }
            }
        }
    };
}

msp_codes! {
    ApiVersion = 1 => "MSP_API_VERSION",
    FcVariant = 2 => "MSP_FC_VARIANT",
    FcVersion = 3 => "MSP_FC_VERSION",
    BoardInfo = 4 => "MSP_BOARD_INFO",
    BuildInfo = 5 => "MSP_BUILD_INFO",
    Name = 10 => "MSP_NAME",
    SetName = 11 => "MSP_SET_NAME",
    NavPoshold = 12 => "MSP_NAV_POSHOLD",
    SetNavPoshold = 13 => "MSP_SET_NAV_POSHOLD",
    WpMissionLoad = 18 => "MSP_WP_MISSION_LOAD",
    WpMissionSave = 19 => "MSP_WP_MISSION_SAVE",
    WpGetInfo = 20 => "MSP_WP_GETINFO",
    RthAndLandConfig = 21 => "MSP_RTH_AND_LAND_CONFIG",
    SetRthAndLandConfig = 22 => "MSP_SET_RTH_AND_LAND_CONFIG",
    FwConfig = 23 => "MSP_FW_CONFIG",
    SetFwConfig = 24 => "MSP_SET_FW_CONFIG",
    BatteryConfig = 32 => "MSP_BATTERY_CONFIG",
    SetBatteryConfig = 33 => "MSP_SET_BATTERY_CONFIG",
    ModeRanges = 34 => "MSP_MODE_RANGES",
    SetModeRange = 35 => "MSP_SET_MODE_RANGE",
    Feature = 36 => "MSP_FEATURE",
    SetFeature = 37 => "MSP_SET_FEATURE",
    BoardAlignment = 38 => "MSP_BOARD_ALIGNMENT",
    SetBoardAlignment = 39 => "MSP_SET_BOARD_ALIGNMENT",
    CurrentMeterConfig = 40 => "MSP_CURRENT_METER_CONFIG",
    SetCurrentMeterConfig = 41 => "MSP_SET_CURRENT_METER_CONFIG",
    MixerConfig = 42 => "MSP_MIXER_CONFIG",
    SetMixerConfig = 43 => "MSP_SET_MIXER_CONFIG",
    RxConfig = 44 => "MSP_RX_CONFIG",
    SetRxConfig = 45 => "MSP_SET_RX_CONFIG",
    LedStripConfig = 48 => "MSP_LED_STRIP_CONFIG",
    SetLedStripConfig = 49 => "MSP_SET_LED_STRIP_CONFIG",
    RssiConfig = 50 => "MSP_RSSI_CONFIG",
    SetRssiConfig = 51 => "MSP_SET_RSSI_CONFIG",
    AdjustmentRanges = 52 => "MSP_ADJUSTMENT_RANGES",
    SetAdjustmentRange = 53 => "MSP_SET_ADJUSTMENT_RANGE",
    CfSerialConfig = 54 => "MSP_CF_SERIAL_CONFIG",
    SetCfSerialConfig = 55 => "MSP_SET_CF_SERIAL_CONFIG",
    VoltageMeterConfig = 56 => "MSP_VOLTAGE_METER_CONFIG",
    SetVoltageMeterConfig = 57 => "MSP_SET_VOLTAGE_METER_CONFIG",
    Sonar = 58 => "MSP_SONAR",
    PidController = 59 => "MSP_PID_CONTROLLER",
    SetPidController = 60 => "MSP_SET_PID_CONTROLLER",
    ArmingConfig = 61 => "MSP_ARMING_CONFIG",
    SetArmingConfig = 62 => "MSP_SET_ARMING_CONFIG",
    RxMap = 64 => "MSP_RX_MAP",
    SetRxMap = 65 => "MSP_SET_RX_MAP",
    BfConfig = 66 => "MSP_BF_CONFIG",
    SetBfConfig = 67 => "MSP_SET_BF_CONFIG",
    SetReboot = 68 => "MSP_SET_REBOOT",
    BfBuildInfo = 69 => "MSP_BF_BUILD_INFO",
    DataflashSummary = 70 => "MSP_DATAFLASH_SUMMARY",
    DataflashRead = 71 => "MSP_DATAFLASH_READ",
    DataflashErase = 72 => "MSP_DATAFLASH_ERASE",
    LoopTime = 73 => "MSP_LOOP_TIME",
    SetLoopTime = 74 => "MSP_SET_LOOP_TIME",
    FailsafeConfig = 75 => "MSP_FAILSAFE_CONFIG",
    SetFailsafeConfig = 76 => "MSP_SET_FAILSAFE_CONFIG",
    RxfailConfig = 77 => "MSP_RXFAIL_CONFIG",
    SetRxfailConfig = 78 => "MSP_SET_RXFAIL_CONFIG",
    SdcardSummary = 79 => "MSP_SDCARD_SUMMARY",
    BlackboxConfig = 80 => "MSP_BLACKBOX_CONFIG",
    SetBlackboxConfig = 81 => "MSP_SET_BLACKBOX_CONFIG",
    TransponderConfig = 82 => "MSP_TRANSPONDER_CONFIG",
    SetTransponderConfig = 83 => "MSP_SET_TRANSPONDER_CONFIG",
    OsdConfig = 84 => "MSP_OSD_CONFIG",
    SetOsdConfig = 85 => "MSP_SET_OSD_CONFIG",
    OsdCharRead = 86 => "MSP_OSD_CHAR_READ",
    OsdCharWrite = 87 => "MSP_OSD_CHAR_WRITE",
    VtxConfig = 88 => "MSP_VTX_CONFIG",
    SetVtxConfig = 89 => "MSP_SET_VTX_CONFIG",
    AdvancedConfig = 90 => "MSP_ADVANCED_CONFIG",
    SetAdvancedConfig = 91 => "MSP_SET_ADVANCED_CONFIG",
    FilterConfig = 92 => "MSP_FILTER_CONFIG",
    SetFilterConfig = 93 => "MSP_SET_FILTER_CONFIG",
    AdvancedTuning = 94 => "MSP_ADVANCED_TUNING",
    SetAdvancedTuning = 95 => "MSP_SET_ADVANCED_TUNING",
    SensorConfig = 96 => "MSP_SENSOR_CONFIG",
    SetSensorConfig = 97 => "MSP_SET_SENSOR_CONFIG",
    CameraControl = 98 => "MSP_CAMERA_CONTROL",
    ArmingDisable = 99 => "MSP_ARMING_DISABLE",
    Ident = 100 => "MSP_IDENT",
    Status = 101 => "MSP_STATUS",
    RawImu = 102 => "MSP_RAW_IMU",
    Servo = 103 => "MSP_SERVO",
    Motor = 104 => "MSP_MOTOR",
    Rc = 105 => "MSP_RC",
    RawGps = 106 => "MSP_RAW_GPS",
    CompGps = 107 => "MSP_COMP_GPS",
    Attitude = 108 => "MSP_ATTITUDE",
    Altitude = 109 => "MSP_ALTITUDE",
    Analog = 110 => "MSP_ANALOG",
    RcTuning = 111 => "MSP_RC_TUNING",
    Pid = 112 => "MSP_PID",
    ActiveBoxes = 113 => "MSP_ACTIVEBOXES",
    Misc = 114 => "MSP_MISC",
    MotorPins = 115 => "MSP_MOTOR_PINS",
    BoxNames = 116 => "MSP_BOXNAMES",
    PidNames = 117 => "MSP_PIDNAMES",
    Wp = 118 => "MSP_WP",
    BoxIds = 119 => "MSP_BOXIDS",
    ServoConfigurations = 120 => "MSP_SERVO_CONFIGURATIONS",
    NavStatus = 121 => "MSP_NAV_STATUS",
    RcDeadband = 125 => "MSP_RC_DEADBAND",
    MotorConfig = 131 => "MSP_MOTOR_CONFIG",
    GpsConfig = 132 => "MSP_GPS_CONFIG",
    CompassConfig = 133 => "MSP_COMPASS_CONFIG",
    EscSensorData = 134 => "MSP_ESC_SENSOR_DATA",
    StatusEx = 150 => "MSP_STATUS_EX",
    SensorStatus = 151 => "MSP_SENSOR_STATUS",
    Uid = 160 => "MSP_UID",
    GpsSvInfo = 164 => "MSP_GPSSVINFO",
    DisplayPort = 182 => "MSP_DISPLAYPORT",
    CopyProfile = 183 => "MSP_COPY_PROFILE",
    BeeperConfig = 184 => "MSP_BEEPER_CONFIG",
    SetBeeperConfig = 185 => "MSP_SET_BEEPER_CONFIG",
    SikRadio = 199 => "MSP_SIKRADIO",
    SetRawRc = 200 => "MSP_SET_RAW_RC",
    SetRawGps = 201 => "MSP_SET_RAW_GPS",
    SetPid = 202 => "MSP_SET_PID",
    SetBox = 203 => "MSP_SET_BOX",
    SetRcTuning = 204 => "MSP_SET_RC_TUNING",
    AccCalibration = 205 => "MSP_ACC_CALIBRATION",
    MagCalibration = 206 => "MSP_MAG_CALIBRATION",
    SetMisc = 207 => "MSP_SET_MISC",
    ResetConf = 208 => "MSP_RESET_CONF",
    SetWp = 209 => "MSP_SET_WP",
    SelectSetting = 210 => "MSP_SELECT_SETTING",
    SetHead = 211 => "MSP_SET_HEAD",
    SetServoConfiguration = 212 => "MSP_SET_SERVO_CONFIGURATION",
    SetMotor = 214 => "MSP_SET_MOTOR",
    SetRcDeadband = 218 => "MSP_SET_RC_DEADBAND",
    SetResetCurrPid = 219 => "MSP_SET_RESET_CURR_PID",
    SetMotorConfig = 222 => "MSP_SET_MOTOR_CONFIG",
    SetGpsConfig = 223 => "MSP_SET_GPS_CONFIG",
    SetCompassConfig = 224 => "MSP_SET_COMPASS_CONFIG",
    SetAccTrim = 239 => "MSP_SET_ACC_TRIM",
    AccTrim = 240 => "MSP_ACC_TRIM",
    EepromWrite = 250 => "MSP_EEPROM_WRITE",
    DebugMsg = 253 => "MSP_DEBUGMSG",
    Debug = 254 => "MSP_DEBUG",
}

impl MspCode {
    /// Collapse `Unknown` values that name a recognized code onto that code.
    ///
    /// `Unknown(100)` and `Ident` put the same byte on the wire; only the
    /// latter comes out of [`from_u8`](Self::from_u8).
    #[must_use]
    pub const fn canonical(self) -> Self {
        Self::from_u8(self.as_u8())
    }

    /// Whether the code belongs to the recognized set
    #[must_use]
    pub const fn is_known(self) -> bool {
        !matches!(self.canonical(), Self::Unknown(_))
    }
}

impl From<u8> for MspCode {
    fn from(value: u8) -> Self {
        Self::from_u8(value)
    }
}

impl From<MspCode> for u8 {
    fn from(code: MspCode) -> Self {
        code.as_u8()
    }
}

impl fmt::Display for MspCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.canonical().name() {
            Some(name) => write!(f, "{name}"),
            None => write!(f, "MSP_UNKNOWN({})", self.as_u8()),
        }
    }
}
