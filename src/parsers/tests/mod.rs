mod amenity_tests;
