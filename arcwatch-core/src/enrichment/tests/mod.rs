mod geoip_tests;
