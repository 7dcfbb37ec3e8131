//! Sensor taxonomy.

define_taxonomy!(
    /// Presentation class of a sensor; drives unit conversion and icons on the hub.
    SensorClass("sensor device class") {
        ApparentPower => "apparent_power",
        Aqi => "aqi",
        AtmosphericPressure => "atmospheric_pressure",
        Battery => "battery",
        CarbonDioxide => "carbon_dioxide",
        CarbonMonoxide => "carbon_monoxide",
        Current => "current",
        DataRate => "data_rate",
        DataSize => "data_size",
        Date => "date",
        Distance => "distance",
        Duration => "duration",
        Energy => "energy",
        EnergyStorage => "energy_storage",
        Enum => "enum",
        Frequency => "frequency",
        Gas => "gas",
        Humidity => "humidity",
        Illuminance => "illuminance",
        Irradiance => "irradiance",
        Moisture => "moisture",
        Monetary => "monetary",
        NitrogenDioxide => "nitrogen_dioxide",
        NitrogenMonoxide => "nitrogen_monoxide",
        NitrousOxide => "nitrous_oxide",
        Ozone => "ozone",
        Ph => "ph",
        Pm1 => "pm1",
        Pm25 => "pm25",
        Pm10 => "pm10",
        Power => "power",
        PowerFactor => "power_factor",
        Precipitation => "precipitation",
        PrecipitationIntensity => "precipitation_intensity",
        Pressure => "pressure",
        ReactivePower => "reactive_power",
        SignalStrength => "signal_strength",
        SoundPressure => "sound_pressure",
        Speed => "speed",
        SulphurDioxide => "sulphur_dioxide",
        Temperature => "temperature",
        Timestamp => "timestamp",
        VolatileOrganicCompounds => "volatile_organic_compounds",
        VolatileOrganicCompoundsParts => "volatile_organic_compounds_parts",
        Voltage => "voltage",
        Volume => "volume",
        VolumeStorage => "volume_storage",
        Water => "water",
        Weight => "weight",
        WindSpeed => "wind_speed",
    }
);
