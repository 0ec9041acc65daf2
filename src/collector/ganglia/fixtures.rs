//! gmond XML dumps used by tests.

/// Two clusters, both reporting `load_one`, as gmond 3.x emits them.
pub const TWO_CLUSTERS: &str = r#"<?xml version="1.0" encoding="ISO-8859-1" standalone="yes"?>
<!DOCTYPE GANGLIA_XML [
   <!ELEMENT GANGLIA_XML (GRID|CLUSTER|HOST)*>
      <!ATTLIST GANGLIA_XML VERSION CDATA #REQUIRED>
      <!ATTLIST GANGLIA_XML SOURCE CDATA #REQUIRED>
   <!ELEMENT CLUSTER (HOST)*>
      <!ATTLIST CLUSTER NAME CDATA #REQUIRED>
   <!ELEMENT HOST (METRIC)*>
      <!ATTLIST HOST NAME CDATA #REQUIRED>
   <!ELEMENT METRIC (EXTRA_DATA*)>
      <!ATTLIST METRIC NAME CDATA #REQUIRED>
      <!ATTLIST METRIC VAL CDATA #REQUIRED>
   <!ELEMENT EXTRA_DATA (EXTRA_ELEMENT*)>
   <!ELEMENT EXTRA_ELEMENT EMPTY>
      <!ATTLIST EXTRA_ELEMENT NAME CDATA #REQUIRED>
      <!ATTLIST EXTRA_ELEMENT VAL CDATA #REQUIRED>
]>
<GANGLIA_XML VERSION="3.1.7" SOURCE="gmond">
<CLUSTER NAME="web" LOCALTIME="1700000000" OWNER="ops" LATLONG="unspecified" URL="unspecified">
<HOST NAME="web-1" IP="10.0.0.1" REPORTED="1700000000" TN="4" TMAX="20" DMAX="0" LOCATION="unspecified" GMOND_STARTED="1699990000">
<METRIC NAME="load_one" VAL="0.25" TYPE="float" UNITS=" " TN="47" TMAX="70" DMAX="0" SLOPE="both">
<EXTRA_DATA>
<EXTRA_ELEMENT NAME="GROUP" VAL="load"/>
<EXTRA_ELEMENT NAME="DESC" VAL="One minute load average"/>
<EXTRA_ELEMENT NAME="TITLE" VAL="One Minute Load Average"/>
</EXTRA_DATA>
</METRIC>
<METRIC NAME="os_name" VAL="Linux" TYPE="string" UNITS="" TN="1000" TMAX="1200" DMAX="0" SLOPE="zero">
<EXTRA_DATA>
<EXTRA_ELEMENT NAME="DESC" VAL="Operating system name"/>
</EXTRA_DATA>
</METRIC>
<METRIC NAME="mem_free" VAL="1024000" TYPE="float" UNITS="KB" TN="10" TMAX="180" DMAX="0" SLOPE="both">
<EXTRA_DATA>
<EXTRA_ELEMENT NAME="GROUP" VAL="memory"/>
<EXTRA_ELEMENT NAME="DESC" VAL="Amount of available memory"/>
<EXTRA_ELEMENT NAME="TITLE" VAL="Free Memory"/>
</EXTRA_DATA>
</METRIC>
</HOST>
</CLUSTER>
<CLUSTER NAME="db" LOCALTIME="1700000000" OWNER="ops" LATLONG="unspecified" URL="unspecified">
<HOST NAME="db-1" IP="10.0.1.1" REPORTED="1700000000" TN="2" TMAX="20" DMAX="0" LOCATION="unspecified" GMOND_STARTED="1699990000">
<METRIC NAME="load_one" VAL="1.5" TYPE="float" UNITS=" " TN="12" TMAX="70" DMAX="0" SLOPE="both">
<EXTRA_DATA>
<EXTRA_ELEMENT NAME="DESC" VAL="Load over the last minute"/>
<EXTRA_ELEMENT NAME="TITLE" VAL="Load"/>
</EXTRA_DATA>
</METRIC>
</HOST>
</CLUSTER>
</GANGLIA_XML>
"#;

/// Metric names that collapse to the same sanitized name, plus a metric
/// without any metadata.
pub const COLLIDING_NAMES: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<GANGLIA_XML VERSION="3.7.2" SOURCE="gmond">
<CLUSTER NAME="compute">
<HOST NAME="node-1">
<METRIC NAME="cpu-1" VAL="10" TYPE="uint32">
<EXTRA_DATA>
<EXTRA_ELEMENT NAME="DESC" VAL="first description"/>
</EXTRA_DATA>
</METRIC>
<METRIC NAME="cpu.1" VAL="20" TYPE="uint32">
<EXTRA_DATA>
<EXTRA_ELEMENT NAME="DESC" VAL="second description"/>
</EXTRA_DATA>
</METRIC>
<METRIC NAME="boottime" VAL="1699990000" TYPE="uint32"/>
</HOST>
</CLUSTER>
</GANGLIA_XML>
"#;
