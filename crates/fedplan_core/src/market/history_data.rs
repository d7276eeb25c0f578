//! Embedded annual market series backing [`super::InMemoryHistory::us_proxies`].
//!
//! Each series is indexed from its start year. Values are decimal annual rates.

/// S&P 500 total return (Shiller), stands in for the C fund.
pub const SP_500_START: i16 = 1927;
pub const SP_500: &[f64] = &[
    0.1071, 0.3490, 0.4533, -0.0803, -0.1985, -0.3873, -0.0936, 0.5318, -0.0791, 0.5231,
    0.3292, -0.2964, 0.1507, 0.0431, -0.0719, -0.0786, 0.1817, 0.2250, 0.1815, 0.3760, -0.1054,
    0.0309, 0.1032, 0.1677, 0.3240, 0.1990, 0.1397, 0.0222, 0.4375, 0.2781, 0.0684, -0.0571,
    0.3839, 0.0780, 0.0587, 0.1897, -0.0266, 0.2045, 0.1562, 0.1168, -0.0634, 0.1558, 0.1052,
    -0.0765, 0.0667, 0.1332, 0.1763, -0.1457, -0.2023, 0.3722, 0.1162, -0.0793, 0.1570, 0.1623,
    0.2494, -0.0613, 0.2736, 0.1987, 0.0727, 0.2477, 0.3002, -0.0181, 0.1715, 0.2260, -0.0102,
    0.3080, 0.0737, 0.1147, 0.0084, 0.3421, 0.2645, 0.2720, 0.3087, 0.1532, -0.0498, -0.1304,
    -0.1972, 0.2807, 0.0606, 0.1004, 0.1316, -0.0085, -0.3455, 0.3176, 0.1609, 0.0348, 0.1586,
    0.2504, 0.1332, -0.0327, 0.2052, 0.2449, -0.0461, 0.2756, 0.1710, 0.2212, -0.1180,
];

/// US small cap (Kenneth French market + SMB), stands in for the S fund.
pub const US_SMALL_CAP_START: i16 = 1927;
pub const US_SMALL_CAP: &[f64] = &[
    0.3036, 0.4285, -0.4551, -0.3426, -0.4070, -0.0361, 1.0140, 0.2907, 0.5564, 0.5019,
    -0.4884, 0.3753, 0.0842, -0.0646, -0.1436, 0.2149, 0.6202, 0.3947, 0.6470, -0.1002,
    -0.0354, -0.0737, 0.2399, 0.3080, 0.1543, 0.0672, -0.0045, 0.4811, 0.1899, 0.0745, -0.1267,
    0.5950, 0.1802, -0.0189, 0.2803, -0.1823, 0.1494, 0.1492, 0.3629, -0.0609, 0.7850, 0.3837,
    -0.2490, -0.1171, 0.2186, 0.0475, -0.4268, -0.2846, 0.5334, 0.4164, 0.1961, 0.2254, 0.4431,
    0.3849, 0.0346, 0.2967, 0.3648, -0.0410, 0.3257, 0.0687, -0.0919, 0.2347, 0.1612, -0.1996,
    0.5089, 0.1745, 0.1769, -0.0061, 0.2700, 0.1656, 0.2346, -0.0069, 0.3903, -0.1590, 0.0660,
    -0.1714, 0.5801, 0.1628, 0.0366, 0.1549, -0.0177, -0.3419, 0.3758, 0.3131, -0.0519, 0.1514,
    0.4282, 0.0411, -0.0367, 0.2010, 0.1702, -0.0819, 0.2414, 0.3751, 0.2013, -0.2691, 0.2316,
    0.1368,
];

/// 3-month Treasury bills (FRED TB3MS), stands in for the G fund.
pub const US_TBILLS_START: i16 = 1934;
pub const US_TBILLS: &[f64] = &[
    0.0028, 0.0017, 0.0017, 0.0028, 0.0006, 0.0005, 0.0004, 0.0013, 0.0034, 0.0038, 0.0038,
    0.0038, 0.0038, 0.0060, 0.0104, 0.0112, 0.0120, 0.0152, 0.0172, 0.0189, 0.0094, 0.0172,
    0.0263, 0.0323, 0.0177, 0.0339, 0.0288, 0.0235, 0.0277, 0.0316, 0.0355, 0.0395, 0.0486,
    0.0431, 0.0534, 0.0667, 0.0639, 0.0433, 0.0407, 0.0703, 0.0783, 0.0577, 0.0497, 0.0527,
    0.0719, 0.1007, 0.1143, 0.1402, 0.1061, 0.0861, 0.0952, 0.0748, 0.0598, 0.0577, 0.0667,
    0.0811, 0.0749, 0.0537, 0.0343, 0.0300, 0.0425, 0.0549, 0.0501, 0.0506, 0.0478, 0.0464,
    0.0582, 0.0339, 0.0160, 0.0101, 0.0137, 0.0315, 0.0473, 0.0435, 0.0137, 0.0015, 0.0014,
    0.0005, 0.0009, 0.0006, 0.0003, 0.0005, 0.0032, 0.0093, 0.0194, 0.0206, 0.0037, 0.0004,
    0.0202, 0.0507, 0.0497, 0.0407,
];

/// Long-term government bonds, stands in for the F fund.
pub const US_LONG_BOND_START: i16 = 1927;
pub const US_LONG_BOND: &[f64] = &[
    0.0503, 0.0239, 0.0342, 0.0462, 0.0185, 0.0338, 0.0581, 0.0526, 0.0491, 0.0322, 0.0297,
    0.0388, 0.0388, 0.0389, 0.0135, -0.0006, 0.0238, 0.0283, 0.0357, 0.0285, 0.0126, 0.0199,
    0.0291, 0.0135, 0.0095, 0.0159, 0.0202, 0.0634, -0.0092, -0.0011, -0.0054, 0.0630, -0.0482,
    0.0607, 0.0599, 0.0338, 0.0349, 0.0253, 0.0342, -0.0084, 0.0372, 0.0049, -0.0255, 0.0125,
    0.1686, 0.0575, 0.0115, 0.0112, 0.0412, 0.1099, 0.0915, -0.0051, 0.0015, -0.0670, -0.0815,
    0.2118, 0.2817, 0.0044, 0.2696, 0.3415, 0.0207, 0.0469, 0.1163, 0.0809, 0.1408, 0.1464,
    0.1610, -0.0378, 0.1108, 0.0771, 0.0712, 0.1506, 0.0228, 0.0250, 0.1412, 0.0827, 0.0938,
    0.0194, 0.0415, 0.0028, 0.0609, 0.1233, 0.0695, 0.0360, 0.0664, 0.1065, -0.0258, 0.0083,
    0.0578, 0.0449, -0.0206, -0.0231, 0.0933, 0.1181, -0.0349, -0.1063, -0.0355,
];

/// Developed markets ex-US (Fama-French), stands in for the I fund.
pub const INTL_DEVELOPED_START: i16 = 1991;
pub const INTL_DEVELOPED: &[f64] = &[
    0.0945, -0.1537, 0.3019, 0.1000, 0.0842, 0.0586, -0.0049, 0.1680, 0.3664, -0.1644, -0.2111,
    -0.1197, 0.4391, 0.2269, 0.1680, 0.2552, 0.1302, -0.4280, 0.3354, 0.1189, -0.1260, 0.1729,
    0.2302, -0.0452, -0.0076, 0.0329, 0.2712, -0.1400, 0.2188, 0.1060, 0.1215, -0.1504, 0.1606,
    0.0359,
];

/// CPI-U, all urban consumers (FRED CPIAUCSL).
pub const US_CPI_START: i16 = 1948;
pub const US_CPI: &[f64] = &[
    0.0273, -0.0183, 0.0580, 0.0596, 0.0091, 0.0060, -0.0037, 0.0037, 0.0283, 0.0304, 0.0176,
    0.0152, 0.0136, 0.0067, 0.0123, 0.0165, 0.0120, 0.0192, 0.0336, 0.0328, 0.0471, 0.0590,
    0.0557, 0.0327, 0.0341, 0.0894, 0.1210, 0.0713, 0.0504, 0.0668, 0.0899, 0.1325, 0.1235,
    0.0891, 0.0383, 0.0379, 0.0404, 0.0379, 0.0119, 0.0433, 0.0441, 0.0464, 0.0625, 0.0298,
    0.0297, 0.0281, 0.0260, 0.0253, 0.0338, 0.0170, 0.0161, 0.0268, 0.0344, 0.0160, 0.0248,
    0.0204, 0.0334, 0.0334, 0.0252, 0.0411, -0.0002, 0.0281, 0.0144, 0.0306, 0.0176, 0.0151,
    0.0065, 0.0064, 0.0205, 0.0213, 0.0200, 0.0232, 0.0132, 0.0716, 0.0641, 0.0332, 0.0287,
    0.0265,
];
